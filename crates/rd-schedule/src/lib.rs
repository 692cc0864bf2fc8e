//! `rd-schedule` — the discrete-event queue.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<T>`, `Scheduled<T>`                       |
//!
//! # Ordering model (summary)
//!
//! Every push is stamped with the queue's next sequence number.  Entries pop
//! by `(time, seq)` ascending:
//!
//! ```text
//! push(5.0, a)  → seq 0
//! push(2.0, b)  → seq 1
//! push(5.0, c)  → seq 2
//! pop order     : b (2.0), a (5.0, seq 0), c (5.0, seq 2)
//! ```
//!
//! The queue knows nothing about what the payloads mean; the dispatch
//! semantics live in `rd-sim`.

pub mod event_queue;

#[cfg(test)]
mod tests;

pub use event_queue::{EventQueue, Scheduled};
