//! `taxi-avoid`: local, reactive collision avoidance.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`scene`]       | `SceneQuery` trait, `SceneHit`, `LayerMask`                |
//! | [`sensor`]      | `HazardSensor` (nearest-agent casts, clearance checks)     |
//! | [`config`]      | `AvoidanceConfig`, `RecoveryConfig`                        |
//! | [`proposal`]    | `Proposal` (lateral weight + speed multiplier)             |
//! | [`front`]       | Front hazard evaluation (time-to-contact bands)            |
//! | [`rear`]        | Rear hazard yield state machine                            |
//! | [`recovery`]    | Post-contact recovery maneuver, yield tie-break            |
//! | [`controller`]  | `AvoidanceController`, per-agent `AvoidanceState`          |
//!
//! # Model
//!
//! Avoidance is purely local: each agent sees only what its own casts
//! return plus the previous tick's telemetry of the agents they hit.  There
//! is no shared plan and no reservation.  Every maneuver ends on its own
//! timeout, so no pair of agents can wait on each other forever.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on configs and state.     |

pub mod config;
pub mod controller;
pub mod front;
pub mod proposal;
pub mod rear;
pub mod recovery;
pub mod scene;
pub mod sensor;


pub use config::{AvoidanceConfig, RecoveryConfig};
pub use controller::{AvoidanceController, AvoidanceOutput, AvoidanceState};
pub use front::{FrontAssessment, FrontSeverity};
pub use proposal::Proposal;
pub use rear::{YieldEnd, YieldState};
pub use recovery::{RecoveryPhase, RecoveryState, yields_to};
pub use scene::{LayerMask, SceneHit, SceneQuery};
pub use sensor::{Hazard, HazardSensor};
