//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the index range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! of the parallel arrays `edge_to`, `edge_weight`.  Every road
//! is undirected and therefore appears twice, once per direction.  Edges are
//! sorted by source node with a *stable* sort, so a node's neighbours are
//! listed in the order their roads were added — Dijkstra relaxes them in
//! that same order on every run.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(x, y)` to the nearest `NodeId`.  Used to
//! snap vehicle and rider coordinates to road nodes before routing.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rd_core::{NodeId, Point, Rect};

use crate::{SpatialError, SpatialResult};

/// Bounds reported by an empty network, so the vehicle index can be sized
/// before any map is loaded.
pub const FALLBACK_BOUNDS: Rect = Rect {
    min: Point::new(0.0, 0.0),
    max: Point::new(7.0, 7.0),
};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// One undirected road as it was loaded.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    pub a:      NodeId,
    pub b:      NodeId,
    pub weight: f64,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected weighted road graph in CSR format plus a spatial index for
/// node snapping.  Read-only once built; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Coordinate of each node.  Indexed by `NodeId`.
    pub node_point: Vec<Point>,

    /// Map-file label of each node.  Indexed by `NodeId`.
    pub node_label: Vec<String>,

    label_index: HashMap<String, NodeId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Destination node of each directed edge.
    pub edge_to: Vec<NodeId>,

    /// Traversal cost of each directed edge (≥ 0).  Used as Dijkstra cost
    /// and directly as travel time.
    pub edge_weight: Vec<f64>,

    /// Every road once, in load order (for reporting / plotting).
    roads: Vec<Road>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_point.len()
    }

    /// Number of directed edges (twice the number of roads).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_point.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    /// Resolve a map-file label.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    pub fn node_point(&self, node: NodeId) -> Option<Point> {
        self.node_point.get(node.index()).copied()
    }

    pub fn node_label(&self, node: NodeId) -> Option<&str> {
        self.node_label.get(node.index()).map(String::as_str)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `(neighbor, weight)` pairs of all outgoing edges from `node`, in road
    /// insertion order.  Empty for an unknown node.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let range = if self.contains_node(node) {
            self.node_out_start[node.index()] as usize..self.node_out_start[node.index() + 1] as usize
        } else {
            0..0
        };
        range.map(|e| (self.edge_to[e], self.edge_weight[e]))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).count()
    }

    /// Every road once, in load order.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the node nearest to `point` by Euclidean distance.
    ///
    /// Equidistant nodes resolve to the lowest `NodeId` so the answer does
    /// not depend on R-tree layout.
    pub fn nearest_node(&self, point: Point) -> SpatialResult<NodeId> {
        let mut iter = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&[point.x, point.y]);
        let (first, best_d2) = iter.next().ok_or(SpatialError::EmptyNetwork)?;
        let mut best = first.id;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Ok(best)
    }

    /// Bounding rectangle of all node coordinates, or [`FALLBACK_BOUNDS`]
    /// when the network is empty.
    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.node_point.iter().copied()).unwrap_or(FALLBACK_BOUNDS)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rd_core::Point;
/// use rd_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("A", Point::new(0.0, 0.0));
/// let d = b.add_node("D", Point::new(10.0, 0.0));
/// b.add_road(a, d, 10.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct RoadNetworkBuilder {
    nodes:       Vec<Point>,
    labels:      Vec<String>,
    label_index: HashMap<String, NodeId>,
    roads:       Vec<Road>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            labels:      Vec::new(),
            label_index: HashMap::new(),
            roads:       Vec::new(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    ///
    /// Labels are unique: re-adding a known label returns the existing id
    /// and keeps the first coordinate seen.
    pub fn add_node(&mut self, label: &str, point: Point) -> NodeId {
        if let Some(&id) = self.label_index.get(label) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(point);
        self.labels.push(label.to_owned());
        self.label_index.insert(label.to_owned(), id);
        id
    }

    /// Add an undirected road.  The weight must be finite and non-negative.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: f64) -> SpatialResult<()> {
        for node in [a, b] {
            if node.index() >= self.nodes.len() {
                return Err(SpatialError::UnknownNode(node));
            }
        }
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(SpatialError::InvalidWeight { a, b, weight });
        }
        self.roads.push(Road { a, b, weight });
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Both directions of every road, then a stable sort by source.
        let mut directed: Vec<(NodeId, NodeId, f64)> = Vec::with_capacity(self.roads.len() * 2);
        for r in &self.roads {
            directed.push((r.a, r.b, r.weight));
            directed.push((r.b, r.a, r.weight));
        }
        directed.sort_by_key(|&(from, _, _)| from.0);

        let edge_to:     Vec<NodeId> = directed.iter().map(|e| e.1).collect();
        let edge_weight: Vec<f64>    = directed.iter().map(|e| e.2).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &directed {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_point: self.nodes,
            node_label: self.labels,
            label_index: self.label_index,
            node_out_start,
            edge_to,
            edge_weight,
            roads: self.roads,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
