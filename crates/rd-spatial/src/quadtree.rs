//! Arena-backed point quadtree for nearest-vehicle queries.
//!
//! # Layout
//!
//! Nodes live in a flat `Vec` and refer to their children by index; the
//! root is always index 0.  A leaf stores up to `capacity` entries.  When a
//! full leaf receives another point it lazily gets four children, its
//! entries are redistributed into them, and insertion continues downward.
//! Internal nodes hold no entries.
//!
//! Nodes are never merged back after removals.  The arena therefore only
//! grows, which keeps indices stable for the life of the tree.
//!
//! # Duplicate coordinates
//!
//! Every insertion is its own entry, keyed by `(point, item)` rather than by
//! point alone, so two vehicles parked at the same coordinate coexist.
//! Leaves at [`MAX_DEPTH`] accept entries past capacity instead of
//! subdividing, which bounds the recursion when many points coincide.
//!
//! # Ordering
//!
//! `k_nearest` orders results by ascending distance; equal distances are
//! broken by insertion sequence (earlier first).  This equals sorting every
//! stored entry by `(distance, insertion order)` and taking the first `k`.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rd_core::{Point, Rect};

use crate::ord::OrdF64;
use crate::{SpatialError, SpatialResult};

/// Leaf capacity used by [`QuadTree::with_default_capacity`].
pub const DEFAULT_CAPACITY: usize = 4;

/// Depth past which leaves stop subdividing.
pub const MAX_DEPTH: u32 = 32;

// ── Arena entries ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Entry<T> {
    point: Point,
    item:  T,
    seq:   u64,
}

#[derive(Clone, Debug)]
struct QuadNode<T> {
    boundary: Rect,
    depth:    u32,
    entries:  Vec<Entry<T>>,
    /// Arena indices in [`Rect::quadrants`] order.
    children: Option<[u32; 4]>,
}

impl<T> QuadNode<T> {
    fn leaf(boundary: Rect, depth: u32) -> Self {
        Self { boundary, depth, entries: Vec::new(), children: None }
    }
}

// ── Neighbor ──────────────────────────────────────────────────────────────────

/// One result of a nearest-neighbour query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor<T> {
    pub item:       T,
    pub point:      Point,
    /// Squared Euclidean distance to the query point.
    pub distance_2: f64,
}

impl<T> Neighbor<T> {
    pub fn distance(&self) -> f64 {
        self.distance_2.sqrt()
    }
}

/// Max-heap element of the bounded best set: the worst candidate on top.
struct Candidate {
    distance_2: OrdF64,
    seq:        u64,
    node:       u32,
    slot:       u32,
}

impl Candidate {
    fn key(&self) -> (OrdF64, u64) {
        (self.distance_2, self.seq)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

// ── QuadTree ──────────────────────────────────────────────────────────────────

/// Point quadtree over a fixed bounding rectangle.
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    nodes:    Vec<QuadNode<T>>,
    capacity: usize,
    len:      usize,
    next_seq: u64,
}

impl<T: Copy + PartialEq> QuadTree<T> {
    /// Create an empty tree covering `boundary` (closed on every edge).
    /// A `capacity` of 0 is treated as 1.
    pub fn new(boundary: Rect, capacity: usize) -> Self {
        Self {
            nodes:    vec![QuadNode::leaf(boundary, 0)],
            capacity: capacity.max(1),
            len:      0,
            next_seq: 0,
        }
    }

    pub fn with_default_capacity(boundary: Rect) -> Self {
        Self::new(boundary, DEFAULT_CAPACITY)
    }

    pub fn boundary(&self) -> Rect {
        self.nodes[0].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arena nodes (1 for a tree that never subdivided).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Store `item` at `point`.
    ///
    /// Fails with [`SpatialError::OutOfBounds`] if `point` lies outside the
    /// tree's boundary (or is not finite); the tree is left unchanged.
    pub fn insert(&mut self, point: Point, item: T) -> SpatialResult<()> {
        if !point.is_finite() || !self.boundary().contains(point) {
            return Err(SpatialError::OutOfBounds { point, boundary: self.boundary() });
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if let Some(children) = node.children {
                idx = children[node.boundary.quadrant_of(point)] as usize;
                continue;
            }
            if node.entries.len() < self.capacity || node.depth >= MAX_DEPTH {
                self.nodes[idx].entries.push(Entry { point, item, seq });
                self.len += 1;
                return Ok(());
            }
            self.subdivide(idx);
        }
    }

    /// Remove the entry holding exactly `item` at exactly `point`.
    ///
    /// Returns `false` if no such entry exists (including when the item is
    /// stored under a different coordinate).
    pub fn remove(&mut self, point: Point, item: &T) -> bool {
        let Some(leaf) = self.leaf_for(point) else {
            return false;
        };
        let entries = &mut self.nodes[leaf].entries;
        match entries.iter().position(|e| e.point == point && e.item == *item) {
            Some(slot) => {
                entries.remove(slot);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Remove the earliest-inserted entry at exactly `point`, whatever its
    /// item, and return that item.
    pub fn remove_first_at(&mut self, point: Point) -> Option<T> {
        let leaf = self.leaf_for(point)?;
        let entries = &mut self.nodes[leaf].entries;
        let slot = entries.iter().position(|e| e.point == point)?;
        self.len -= 1;
        Some(entries.remove(slot).item)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Up to `k` entries ordered by ascending distance to `query`.
    ///
    /// Best-first search: subtrees are visited in order of their minimum
    /// possible distance to `query`, and the search stops once that lower
    /// bound exceeds the worst of the `k` best entries found so far.
    pub fn k_nearest(&self, query: Point, k: usize) -> Vec<Neighbor<T>> {
        if k == 0 || self.len == 0 {
            return Vec::new();
        }

        let mut frontier: BinaryHeap<Reverse<(OrdF64, u32)>> = BinaryHeap::new();
        frontier.push(Reverse((OrdF64(self.nodes[0].boundary.min_distance_2(query)), 0)));
        let mut best: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);

        while let Some(Reverse((OrdF64(bound), idx))) = frontier.pop() {
            // Equal bounds are still explored: they may hold an earlier tie.
            if best.len() == k && best.peek().is_some_and(|w| bound > w.distance_2.0) {
                break;
            }
            let node = &self.nodes[idx as usize];
            if let Some(children) = node.children {
                for child in children {
                    let d = self.nodes[child as usize].boundary.min_distance_2(query);
                    frontier.push(Reverse((OrdF64(d), child)));
                }
                continue;
            }
            for (slot, e) in node.entries.iter().enumerate() {
                let cand = Candidate {
                    distance_2: OrdF64(e.point.distance_2(query)),
                    seq:        e.seq,
                    node:       idx,
                    slot:       slot as u32,
                };
                if best.len() < k {
                    best.push(cand);
                } else if best.peek().is_some_and(|w| cand < *w) {
                    best.pop();
                    best.push(cand);
                }
            }
        }

        best.into_sorted_vec()
            .into_iter()
            .map(|c| {
                let e = &self.nodes[c.node as usize].entries[c.slot as usize];
                Neighbor { item: e.item, point: e.point, distance_2: c.distance_2.0 }
            })
            .collect()
    }

    /// The single nearest entry, if any.
    pub fn nearest(&self, query: Point) -> Option<Neighbor<T>> {
        self.k_nearest(query, 1).into_iter().next()
    }

    /// `true` if `item` is stored anywhere in the tree.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|(_, it)| it == *item)
    }

    /// All `(point, item)` entries in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, T)> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.entries.iter().map(|e| (e.point, e.item)))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Arena index of the leaf whose region owns `point`.
    fn leaf_for(&self, point: Point) -> Option<usize> {
        if !self.boundary().contains(point) {
            return None;
        }
        let mut idx = 0usize;
        while let Some(children) = self.nodes[idx].children {
            idx = children[self.nodes[idx].boundary.quadrant_of(point)] as usize;
        }
        Some(idx)
    }

    /// Give leaf `idx` four children and move its entries into them.
    fn subdivide(&mut self, idx: usize) {
        let boundary = self.nodes[idx].boundary;
        let depth = self.nodes[idx].depth + 1;
        let first = self.nodes.len() as u32;
        for quad in boundary.quadrants() {
            self.nodes.push(QuadNode::leaf(quad, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let entries = std::mem::take(&mut self.nodes[idx].entries);
        self.nodes[idx].children = Some(children);
        // Sequence order is preserved within each child.
        for e in entries {
            let child = children[boundary.quadrant_of(e.point)] as usize;
            self.nodes[child].entries.push(e);
        }
    }
}
