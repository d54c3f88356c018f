//! `taxi-agent`: Structure-of-Arrays agent state and live telemetry.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`store`]       | `AgentStore` (SoA arrays: pose, motion, trip telemetry)    |
//! | [`telemetry`]   | `TripStatus`, `TelemetryConfig`, `Telemetry` read view     |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                  |
//!
//! # Ownership
//!
//! Each agent's row is written only through the simulation's apply step for
//! that agent.  Everyone else (neighbours' avoidance, output writers) reads
//! it as a snapshot of the end of the previous tick.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.  |

pub mod builder;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use store::AgentStore;
pub use telemetry::{Telemetry, TelemetryConfig, TripStatus};
