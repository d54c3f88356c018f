//! Waypoint graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing
//! connections.  Given a `NodeId n`, its outgoing connections occupy the
//! `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Connections are sorted by source with a **stable** sort, so a waypoint's
//! outgoing connections keep the order they were declared in.  A* expands
//! neighbours in that order, which is part of what makes its result
//! reproducible.
//!
//! Connection cost is the Euclidean distance between the two waypoints,
//! computed once at build time.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a world position to the nearest waypoint.
//! Used at setup time to place a taxi on its start waypoint.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use taxi_core::{EdgeId, NodeId, Vec3};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Connection ────────────────────────────────────────────────────────────────

/// A directed, costed link between two waypoints.
///
/// `A → B` says nothing about `B → A`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub from: NodeId,
    pub to:   NodeId,
    /// Euclidean distance between `from` and `to`.
    pub cost: f32,
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Directed waypoint graph in CSR format plus a spatial index.
///
/// Read-only once built.  Construct with [`WaypointGraphBuilder`] or
/// [`WaypointGraph::from_declarations`][crate::setup].
pub struct WaypointGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// World position of each waypoint.  Indexed by `NodeId`.
    pub node_pos: Vec<Vec3>,

    /// Display name of each waypoint.  Indexed by `NodeId`.
    pub node_name: Vec<String>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,
    pub edge_cost: Vec<f32>,

    // ── Lookup ────────────────────────────────────────────────────────────
    by_name:     HashMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl WaypointGraph {
    /// A graph with no waypoints.  Every routing request against it fails.
    pub fn empty() -> Self {
        WaypointGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Position of `node`.
    ///
    /// # Panics
    /// Panics if `node` is not in the graph; check with [`contains`](Self::contains)
    /// for IDs that did not come from this graph.
    #[inline]
    pub fn position(&self, node: NodeId) -> Vec3 {
        self.node_pos[node.index()]
    }

    pub fn name(&self, node: NodeId) -> &str {
        self.node_name.get(node.index()).map(String::as_str).unwrap_or("<unknown>")
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// `EdgeId`s of all connections leaving `node`, in declaration order.
    /// Empty for unknown nodes.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = if self.contains(node) {
            (
                self.node_out_start[node.index()] as usize,
                self.node_out_start[node.index() + 1] as usize,
            )
        } else {
            (0, 0)
        };
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Connections leaving `node`, in declaration order.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = Connection> + '_ {
        self.out_edges(node).map(move |e| self.connection(e))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        if !self.contains(node) {
            return 0;
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    #[inline]
    pub fn connection(&self, edge: EdgeId) -> Connection {
        Connection {
            from: self.edge_from[edge.index()],
            to:   self.edge_to[edge.index()],
            cost: self.edge_cost[edge.index()],
        }
    }

    /// The connection `from → to`, if one exists.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Straight-line distance between two waypoints (the A* heuristic).
    #[inline]
    pub fn straight_line(&self, a: NodeId, b: NodeId) -> f32 {
        self.position(a).distance(self.position(b))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The waypoint nearest to `pos`.  `None` only for an empty graph.
    pub fn nearest_waypoint(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y, pos.z])
            .map(|e| e.id)
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use taxi_core::Vec3;
/// use taxi_graph::WaypointGraphBuilder;
///
/// let mut b = WaypointGraphBuilder::new();
/// let a = b.add_waypoint("rank", Vec3::ground(0.0, 0.0));
/// let c = b.add_waypoint("mall", Vec3::ground(30.0, 40.0));
/// assert!(b.add_connection(a, Some(c)));
/// assert!(!b.add_connection(c, None)); // missing destination: rejected
/// let graph = b.build();
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.connection(graph.find_edge(a, c).unwrap()).cost, 50.0);
/// ```
pub struct WaypointGraphBuilder {
    names:     Vec<String>,
    positions: Vec<Vec3>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self { names: Vec::new(), positions: Vec::new(), raw_edges: Vec::new() }
    }

    /// Add a waypoint and return its `NodeId` (sequential from 0).
    pub fn add_waypoint(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.names.push(name.into());
        self.positions.push(position);
        id
    }

    /// Append the directed connection `from → to`.
    ///
    /// A connection with no destination, or whose endpoints are not
    /// waypoints of this builder, is dropped with a warning and `false` is
    /// returned.  It is never an error: one bad connection must not take the
    /// rest of the network down with it.
    pub fn add_connection(&mut self, from: NodeId, to: Option<NodeId>) -> bool {
        let from_name = self.names.get(from.index()).map(String::as_str);
        let Some(from_name) = from_name else {
            tracing::warn!(%from, "connection source is not a waypoint; dropped");
            return false;
        };
        match to {
            Some(to) if to.index() < self.positions.len() => {
                self.raw_edges.push((from, to));
                true
            }
            Some(to) => {
                tracing::warn!(waypoint = from_name, %to, "connection points at an unknown waypoint; dropped");
                false
            }
            None => {
                tracing::warn!(waypoint = from_name, "connection has a missing destination; dropped");
                false
            }
        }
    }

    /// Convenience: connections in both directions.
    pub fn add_two_way(&mut self, a: NodeId, b: NodeId) {
        self.add_connection(a, Some(b));
        self.add_connection(b, Some(a));
    }

    pub fn node_count(&self) -> usize { self.positions.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WaypointGraph`].
    pub fn build(self) -> WaypointGraph {
        let node_count = self.positions.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|(from, _)| from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|&(f, _)| f).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|&(_, t)| t).collect();
        let edge_cost: Vec<f32>    = raw
            .iter()
            .map(|&(f, t)| self.positions[f.index()].distance(self.positions[t.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for (from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let mut by_name = HashMap::with_capacity(node_count);
        for (i, name) in self.names.iter().enumerate() {
            if by_name.insert(name.clone(), NodeId(i as u32)).is_some() {
                tracing::warn!(waypoint = name.as_str(), "duplicate waypoint name; lookups resolve to the last one");
            }
        }

        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y, p.z], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WaypointGraph {
            node_pos: self.positions,
            node_name: self.names,
            node_out_start,
            edge_from,
            edge_to,
            edge_cost,
            by_name,
            spatial_idx,
        }
    }
}

impl Default for WaypointGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
