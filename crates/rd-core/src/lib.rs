//! `rd-core` — foundational types for the `ride_dispatch` simulator.
//!
//! This crate is a dependency of every other `rd-*` crate.  It has no
//! `rd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `VehicleId`, `RiderId`                      |
//! | [`geo`]         | `Point`, `Rect`                                       |
//! | [`time`]        | `SimTime`, `SimClock`, `SimConfig`                    |
//! | [`rng`]         | `SimRng` (the single seeded entropy source of a run)  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Point, Rect};
pub use ids::{NodeId, RiderId, VehicleId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime};
