//! `rd-sim` — discrete-event dispatch loop for the ride_dispatch simulator.
//!
//! # Event loop
//!
//! ```text
//! while the queue is non-empty:
//!   pop the earliest (time, seq) event; stop if time ≥ max_time
//!   advance the clock to its time
//!   RiderRequest   — create a rider, ask the quadtree for the k nearest
//!                    available vehicles, route each to the pickup, take
//!                    the fastest; schedule PickupArrival + DropoffArrival;
//!                    schedule the next generated request
//!   PickupArrival  — vehicle moves to the pickup, rider boards
//!   DropoffArrival — vehicle moves to the destination, trip is archived,
//!                    vehicle re-enters the quadtree as Available
//! ```
//!
//! Pickup and dropoff events re-check the vehicle's and rider's states when
//! they fire and do nothing if either has moved on (the stale-event policy;
//! the queue has no cancellation).
//!
//! A vehicle is in the quadtree if and only if it is `Available`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rd_core::{Point, SimConfig};
//! use rd_sim::{NoopObserver, SimBuilder};
//! use rd_spatial::{load_map_file, DijkstraRouter};
//!
//! let network = load_map_file(Path::new("map.csv"))?;
//! let mut sim = SimBuilder::new(SimConfig::default(), network, DijkstraRouter)
//!     .vehicles([Point::new(0.0, 0.0), Point::new(2.0, 0.0)])
//!     .build()?;
//! let metrics = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod fleet;
pub mod metrics;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{EventKind, EventOutcome, EventRecord, RequestSource, SimEvent};
pub use fleet::{CompletedTrip, Rider, RiderState, Vehicle, VehicleState};
pub use metrics::{Metrics, VehicleTrips};
pub use observer::{NoopObserver, SimObserver, TraceRecorder};
pub use sim::Sim;
