//! `EventQueue` — time-ordered queue of scheduled payloads.
//!
//! A binary min-heap keyed by `(SimTime, seq)`.  `seq` is a counter owned by
//! the queue and incremented on every push, so payloads scheduled for the
//! same instant pop in the order they were pushed, independent of heap
//! internals.  Replaying the same sequence of pushes therefore replays the
//! same pop order exactly.
//!
//! There is no cancellation.  Consumers that may see an event outlive its
//! purpose must re-validate it when it pops.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use rd_core::SimTime;

/// A payload together with its ordering key.
#[derive(Clone, Debug)]
pub struct Scheduled<T> {
    pub time:    SimTime,
    /// Insertion sequence number (unique within one queue).
    pub seq:     u64,
    pub payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    /// Reversed so `BinaryHeap` (a max-heap) pops the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of `(time, payload)` with FIFO tie-breaking.
pub struct EventQueue<T> {
    heap:     BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 0 }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` at `time` and return its sequence number.
    pub fn push(&mut self, time: SimTime, payload: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { time, seq, payload });
        trace!(%time, seq, queued = self.heap.len(), "event scheduled");
        seq
    }

    /// Remove and return the earliest entry (lowest `seq` among equal times).
    pub fn pop_min(&mut self) -> Option<Scheduled<T>> {
        self.heap.pop()
    }

    /// The earliest entry without removing it.
    pub fn peek(&self) -> Option<&Scheduled<T>> {
        self.heap.peek()
    }

    /// Timestamp of the earliest entry, or `None` if empty.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|s| s.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of pushes so far (the next sequence number).
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }
}
