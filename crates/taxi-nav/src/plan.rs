//! Turning a taxi's configured waypoints into a route.

use taxi_core::NodeId;
use taxi_graph::{Route, RouteAssembler, Router, WaypointGraph};

use crate::{NavError, NavResult};

/// The three waypoints of a pickup-and-return trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripPlan {
    pub start: NodeId,
    pub pickup: NodeId,
    pub end: NodeId,
}

impl TripPlan {
    pub fn new(start: NodeId, pickup: NodeId, end: NodeId) -> Self {
        Self { start, pickup, end }
    }

    /// Look up the trip's waypoints by name.
    pub fn resolve(
        graph: &WaypointGraph,
        start: Option<&str>,
        pickup: Option<&str>,
        end: Option<&str>,
    ) -> NavResult<TripPlan> {
        let find = |role: &'static str, name: Option<&str>| -> NavResult<NodeId> {
            let name = name.ok_or(NavError::MissingWaypoint { role })?;
            graph
                .node_by_name(name)
                .ok_or_else(|| NavError::UnknownWaypoint { role, name: name.to_string() })
        };
        Ok(TripPlan {
            start: find("start", start)?,
            pickup: find("pickup", pickup)?,
            end: find("end", end)?,
        })
    }

    /// start → pickup → end → start
    pub fn via(&self) -> [NodeId; 4] {
        [self.start, self.pickup, self.end, self.start]
    }

    /// Route the whole trip.  An empty route is an error here so the caller
    /// can report it; the taxi then stays idle.
    pub fn assemble<R: Router + ?Sized>(&self, graph: &WaypointGraph, router: &R) -> NavResult<Route> {
        let route = RouteAssembler::new(router).assemble(graph, &self.via());
        if route.is_empty() {
            return Err(NavError::Unreachable);
        }
        Ok(route)
    }
}
