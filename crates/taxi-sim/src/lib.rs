//! `taxi-sim`: tick loop orchestrator for the taxi navigation engine.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Compute:  every live taxi's PathFollower senses the scene built from
//!               last tick's AgentStore, runs front/rear avoidance or its
//!               collision recovery, and returns a FollowStep
//!               (parallel with the `parallel` feature).
//!   ② Apply:    for each step in ascending AgentId order:
//!                 position (+ decaying residual velocity), heading,
//!                 speed/distance telemetry, passengers, status, trip timer
//!   ③ Contacts: bodies that started touching this tick:
//!                 CollisionEvent → CollisionLog + observer
//!                 separation impulse → residual velocity
//!                 on_contact for both → the yielding one starts recovery
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `serde`    | Derives on `TaxiSpec`, `SceneConfig`, collision events.|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//! | `fx-hash`  | FxHash for the per-tick contact pair set.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use taxi_core::SimConfig;
//! use taxi_sim::{NoopObserver, SimBuilder, TaxiSpec};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), graph)
//!     .taxi(TaxiSpec::new("Taxi A").trip("Rank", "Station", "Hotel"))
//!     .build()?;
//! sim.run_until_complete(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod collision;
pub mod error;
pub mod observer;
pub mod scene;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::{SimBuilder, TaxiSpec};
pub use collision::{CollisionEvent, CollisionLog};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use scene::{AgentScene, SceneConfig, StaticCollider};
pub use sim::Sim;
