//! `taxi-nav`: trip planning and the per-tick path follower.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`plan`]      | `TripPlan`, start/pickup/end resolution and route assembly      |
//! | [`config`]    | `FollowerConfig`, `SpeedPenalty`                                |
//! | [`boarding`]  | `BoardingActivity` trait, `TimedBoarding`                       |
//! | [`follower`]  | `PathFollower<B>`, `NavContext`, `FollowStep`, `FollowState`    |
//! | [`error`]     | `NavError`, `NavResult<T>`                                      |
//!
//! # Trip model
//!
//! A trip is the route `start → pickup → end → start`, assembled once when
//! the taxi is created.  The follower drives the route connection by
//! connection and reacts to leg boundaries:
//!
//! 1. end of leg 0: the passenger boards (count += 1, boarding activity runs);
//! 2. end of leg 1: the passenger is dropped and the taxi heads home;
//! 3. end of the last leg: the trip is complete and the taxi stops for good.
//!
//! Every tick the follower asks the shared
//! [`AvoidanceController`][taxi_avoid::AvoidanceController] for a lateral
//! weight and speed multiplier before moving.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on configs and follower.  |

pub mod boarding;
pub mod config;
pub mod error;
pub mod follower;
pub mod plan;


pub use boarding::{BoardingActivity, TimedBoarding};
pub use config::{FollowerConfig, SpeedPenalty};
pub use error::{NavError, NavResult};
pub use follower::{FollowState, FollowStep, NavContext, PathFollower};
pub use plan::TripPlan;
