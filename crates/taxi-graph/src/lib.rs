//! `taxi-graph`: waypoint graph, pathfinding, and route assembly.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`graph`]   | `WaypointGraph` (CSR + R-tree), `WaypointGraphBuilder`, `Connection` |
//! | [`setup`]   | `WaypointDecl`, declarative world setup                       |
//! | [`astar`]   | `Router` trait, `Path`, `AStarRouter`                         |
//! | [`route`]   | `Route` (with leg boundaries), `RouteAssembler`               |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod astar;
pub mod error;
pub mod graph;
pub mod route;
pub mod setup;


pub use astar::{AStarRouter, Path, Router};
pub use error::{SpatialError, SpatialResult};
pub use graph::{Connection, WaypointGraph, WaypointGraphBuilder};
pub use route::{Route, RouteAssembler};
pub use setup::WaypointDecl;
