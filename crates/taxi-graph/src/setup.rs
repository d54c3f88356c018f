//! Declarative world setup.
//!
//! A level describes its road network the way a level editor stores it:
//! each waypoint carries its own list of outgoing connections, naming the
//! destination waypoint.  An editor can leave a connection's destination
//! blank, so destinations are `Option`s here and a blank one is a warning,
//! not a failure.

use taxi_core::Vec3;

use crate::{WaypointGraph, WaypointGraphBuilder};

/// One waypoint as declared by the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointDecl {
    pub name: String,
    pub position: Vec3,
    /// Destination waypoint names of this waypoint's outgoing connections.
    #[cfg_attr(feature = "serde", serde(default))]
    pub connections: Vec<Option<String>>,
}

impl WaypointDecl {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self { name: name.into(), position, connections: Vec::new() }
    }

    /// Builder-style: add an outgoing connection to `to`.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.connections.push(Some(to.into()));
        self
    }
}

impl WaypointGraph {
    /// Build the graph from every waypoint the world declares.
    ///
    /// Connections are added in declaration order.  A connection with a
    /// blank or unknown destination is logged and skipped.
    pub fn from_declarations(decls: &[WaypointDecl]) -> WaypointGraph {
        let mut b = WaypointGraphBuilder::new();
        let ids: Vec<_> = decls
            .iter()
            .map(|d| b.add_waypoint(d.name.clone(), d.position))
            .collect();

        let lookup = |name: &str| {
            decls.iter().position(|d| d.name == name).map(|i| ids[i])
        };

        for (decl, &from) in decls.iter().zip(&ids) {
            for target in &decl.connections {
                match target.as_deref() {
                    Some(name) => match lookup(name) {
                        Some(to) => {
                            b.add_connection(from, Some(to));
                        }
                        None => {
                            tracing::warn!(
                                waypoint = decl.name.as_str(),
                                target = name,
                                "connection names an unknown waypoint; dropped"
                            );
                        }
                    },
                    None => {
                        // Logged by the builder.
                        b.add_connection(from, None);
                    }
                }
            }
        }

        b.build()
    }
}
