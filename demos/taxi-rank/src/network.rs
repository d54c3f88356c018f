//! Built-in taxi rank road network.
//!
//! A one-way ring road around a small town centre with a two-way spur out to
//! the station, and a cut-through from the church back to the square.
//! Every route out of the west side funnels through Square → Junction.

use taxi_core::Vec3;
use taxi_graph::WaypointDecl;

/// Waypoints of the built-in network, in declaration order.
pub fn waypoints() -> Vec<WaypointDecl> {
    vec![
        WaypointDecl::new("Rank",     Vec3::ground(0.0, 0.0)).to("Square"),
        WaypointDecl::new("Square",   Vec3::ground(40.0, 0.0)).to("Junction"),
        WaypointDecl::new("Junction", Vec3::ground(80.0, 0.0)).to("Station").to("Hotel"),
        WaypointDecl::new("Station",  Vec3::ground(140.0, 10.0)).to("Junction"),
        WaypointDecl::new("Hotel",    Vec3::ground(80.0, 50.0)).to("Market"),
        WaypointDecl::new("Market",   Vec3::ground(40.0, 60.0)).to("Church"),
        WaypointDecl::new("Church",   Vec3::ground(0.0, 50.0)).to("Rank").to("Square"),
    ]
}
