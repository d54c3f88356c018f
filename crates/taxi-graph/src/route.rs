//! Multi-leg route assembly.
//!
//! A taxi trip visits a sequence of waypoints (start, pickup, end, start).
//! [`RouteAssembler`] routes each consecutive pair and concatenates the legs
//! into one [`Route`], remembering where each leg ends so the follower can
//! tell when it reaches a pickup or turns for home.

use taxi_core::{EdgeId, NodeId};

use crate::{Router, WaypointGraph};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Concatenated connections of a multi-leg trip.
///
/// `leg_boundaries[i]` is the number of connections up to and including the
/// end of leg `i`, so the last boundary always equals `edges.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub edges:          Vec<EdgeId>,
    pub leg_boundaries: Vec<usize>,
    pub total_cost:     f32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// An empty route disables movement.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn leg_count(&self) -> usize {
        self.leg_boundaries.len()
    }

    /// Connection index at which leg `leg` ends.  `None` past the last leg.
    pub fn boundary(&self, leg: usize) -> Option<usize> {
        self.leg_boundaries.get(leg).copied()
    }

    /// Leg that connection `index` belongs to.  `None` for `index >= len()`.
    pub fn leg_of(&self, index: usize) -> Option<usize> {
        if index >= self.edges.len() {
            return None;
        }
        self.leg_boundaries.iter().position(|&b| index < b)
    }

    /// Connection at `index`.
    pub fn edge(&self, index: usize) -> Option<EdgeId> {
        self.edges.get(index).copied()
    }

    /// Waypoint the connection at `index` leads to.
    pub fn target(&self, graph: &WaypointGraph, index: usize) -> Option<NodeId> {
        self.edge(index).map(|e| graph.edge_to[e.index()])
    }
}

// ── RouteAssembler ────────────────────────────────────────────────────────────

/// Routes a via-list leg by leg with any [`Router`].
pub struct RouteAssembler<'r, R: Router + ?Sized> {
    router: &'r R,
}

impl<'r, R: Router + ?Sized> RouteAssembler<'r, R> {
    pub fn new(router: &'r R) -> Self {
        Self { router }
    }

    /// Route `via[0] → via[1] → … → via[n-1]`.
    ///
    /// A leg whose endpoints coincide contributes no connections but still
    /// records a boundary.  If any leg is unreachable the whole route is
    /// empty: a partial trip would strand the taxi mid-network.
    pub fn assemble(&self, graph: &WaypointGraph, via: &[NodeId]) -> Route {
        let mut route = Route::default();

        for pair in via.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match self.router.route(graph, from, to) {
                Ok(path) => {
                    route.edges.extend_from_slice(&path.edges);
                    route.total_cost += path.cost;
                    route.leg_boundaries.push(route.edges.len());
                }
                Err(e) => {
                    tracing::warn!(
                        from = graph.name(from),
                        to = graph.name(to),
                        "route leg unreachable, discarding whole route: {e}"
                    );
                    return Route::default();
                }
            }
        }

        tracing::debug!(
            legs = route.leg_count(),
            connections = route.len(),
            cost = route.total_cost,
            "route assembled"
        );
        route
    }
}
