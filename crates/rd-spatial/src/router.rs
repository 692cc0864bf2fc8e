//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `rd-sim` calls routing via the [`Router`] trait, so applications can swap
//! in custom implementations (A*, precomputed tables) without touching the
//! dispatch loop.  The default [`DijkstraRouter`] is sufficient for city-size
//! maps.
//!
//! # Unreachable destinations
//!
//! A disconnected pair is not an error.  The router returns
//! [`Route::unreachable`] (empty path, infinite cost) and callers check
//! [`Route::is_reachable`] before scheduling anything from it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rd_core::{NodeId, Point};

use crate::network::RoadNetwork;
use crate::ord::OrdF64;
use crate::SpatialResult;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the ordered node path and its total cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Nodes to visit in order.  The source is first and the destination
    /// last; a trivial route is `[source]`.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along `nodes`.  `f64::INFINITY` when unreachable.
    pub cost: f64,
}

impl Route {
    /// The "no route" sentinel.
    pub fn unreachable() -> Self {
        Route { nodes: Vec::new(), cost: f64::INFINITY }
    }

    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router {
    /// Least-cost route from `from` to `to`.
    ///
    /// Returns [`Route::unreachable`] if no path exists or either node is
    /// unknown to `network`.
    fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Route;
}

impl<R: Router + ?Sized> Router for &R {
    fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Route {
        (**self).shortest_path(network, from, to)
    }
}

/// Snap both coordinates to their nearest road nodes, then route between
/// them.  Fails only on an empty network.
pub fn route_between<R: Router + ?Sized>(
    network: &RoadNetwork,
    router:  &R,
    from:    Point,
    to:      Point,
) -> SpatialResult<Route> {
    let a = network.nearest_node(from)?;
    let b = network.nearest_node(to)?;
    Ok(router.shortest_path(network, a, b))
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, using
/// `edge_weight` as cost.
///
/// # Determinism
///
/// The heap key is `(cost, NodeId)`: nodes tied on tentative distance are
/// settled in ascending `NodeId` order, and neighbours are relaxed in road
/// insertion order with a strict `<`, so the first-found predecessor wins.
/// For a fixed network the returned path never varies between runs.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Route {
        dijkstra(network, from, to)
    }
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> Route {
    if !network.contains_node(from) || !network.contains_node(to) {
        return Route::unreachable();
    }

    let n = network.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = node that reached v; NodeId::INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];
    let mut settled = vec![false; n];

    dist[from.index()] = 0.0;

    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<(OrdF64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrdF64(0.0), from)));

    while let Some(Reverse((OrdF64(cost), node))) = heap.pop() {
        if node == to {
            return Route { nodes: reconstruct(&prev, from, to), cost };
        }

        // Skip stale heap entries.
        if settled[node.index()] || cost > dist[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        for (neighbor, weight) in network.neighbors(node) {
            let new_cost = cost + weight;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((OrdF64(new_cost), neighbor)));
            }
        }
    }

    Route::unreachable()
}

/// Walk predecessors back from `to`; the result starts at `from`.
fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
