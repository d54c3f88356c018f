//! Routing trait and the default A* implementation.
//!
//! # Pluggability
//!
//! Route assembly calls routing through the [`Router`] trait, so a different
//! search (or a scripted router in tests) can be dropped in without touching
//! the navigation code.
//!
//! # Search discipline
//!
//! Frontier priority is `f = g + h`, where `g` is the accumulated connection
//! cost and `h` the straight-line distance to the goal.  Connection costs are
//! themselves straight-line distances, so `h` never overestimates and is
//! consistent.  Ties on `f` go to the entry pushed first; the sequence number
//! in the heap key makes that explicit rather than leaving it to heap
//! internals.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use taxi_core::{EdgeId, NodeId};

use crate::{SpatialError, SpatialResult, WaypointGraph};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a single search: connections to traverse, start to goal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub edges: Vec<EdgeId>,
    pub cost:  f32,
}

impl Path {
    /// `true` if start and goal were the same waypoint.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path search.
pub trait Router {
    /// Search `start → goal`.
    ///
    /// `start == goal` is an empty path, not an error.  An unreachable goal
    /// is [`SpatialError::NoRoute`].
    fn route(&self, graph: &WaypointGraph, start: NodeId, goal: NodeId) -> SpatialResult<Path>;

    /// Like [`route`](Self::route) but in the "empty means unreachable" form:
    /// failures are logged and come back as an empty connection list.
    fn pathfind(&self, graph: &WaypointGraph, start: NodeId, goal: NodeId) -> Vec<EdgeId> {
        match self.route(graph, start, goal) {
            Ok(path) => path.edges,
            Err(e) => {
                tracing::warn!(
                    from = graph.name(start),
                    to = graph.name(goal),
                    "pathfinding failed: {e}"
                );
                Vec::new()
            }
        }
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the waypoint graph with a Euclidean heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &WaypointGraph, start: NodeId, goal: NodeId) -> SpatialResult<Path> {
        astar(graph, start, goal)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Heap key: lowest `f` first, then lowest insertion sequence (FIFO).  The
/// `g` recorded at push time rides along to detect stale entries; the
/// sequence number is unique, so it never takes part in the ordering.
type FrontierEntry = Reverse<(OrderedFloat<f32>, u64, NodeId, OrderedFloat<f32>)>;

fn astar(graph: &WaypointGraph, start: NodeId, goal: NodeId) -> SpatialResult<Path> {
    for node in [start, goal] {
        if !graph.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if start == goal {
        return Ok(Path::default());
    }

    let n = graph.node_count();
    // g[v] = best known cost from start to v.
    let mut g = vec![f32::INFINITY; n];
    // prev_edge[v] = connection that reached v on the best known path.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    let mut seq: u64 = 0;
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();

    g[start.index()] = 0.0;
    frontier.push(Reverse((
        OrderedFloat(graph.straight_line(start, goal)),
        seq,
        start,
        OrderedFloat(0.0),
    )));

    while let Some(Reverse((_, _, node, OrderedFloat(g_pushed)))) = frontier.pop() {
        let g_node = g[node.index()];

        // Stale entry: a cheaper path to `node` was found after this push.
        if g_pushed > g_node {
            continue;
        }

        if node == goal {
            return Ok(reconstruct(graph, &prev_edge, start, goal, g_node));
        }

        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let tentative = g_node + graph.edge_cost[edge.index()];
            if tentative < g[next.index()] {
                g[next.index()] = tentative;
                prev_edge[next.index()] = edge;
                seq += 1;
                let priority = tentative + graph.straight_line(next, goal);
                frontier.push(Reverse((
                    OrderedFloat(priority),
                    seq,
                    next,
                    OrderedFloat(tentative),
                )));
            }
        }
    }

    Err(SpatialError::NoRoute { from: start, to: goal })
}

fn reconstruct(
    graph: &WaypointGraph,
    prev_edge: &[EdgeId],
    start: NodeId,
    goal: NodeId,
    cost: f32,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = goal;
    while cur != start {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    Path { edges, cost }
}
