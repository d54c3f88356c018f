//! `taxi-core`: foundational types for the taxi navigation engine.
//!
//! This crate is a dependency of every other `taxi-*` crate.  It has no
//! `taxi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `EdgeId`                          |
//! | [`geo`]     | `Vec3`, planar heading helpers                         |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                        |
//! | [`rng`]     | `SimRng` (seeded scenario randomness)                  |
//! | [`error`]   | `CoreError`, `CoreResult`                              |
//!
//! # Conventions
//!
//! World space uses **+Y up**.  All motion is planar in X/Z;
//! an agent's height is carried along unchanged.  A heading (yaw) of `0`
//! faces `+Z`, and the agent's right-hand side is then `+X`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Vec3;
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
