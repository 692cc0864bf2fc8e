//! `rd-output` — reporting handoff for the ride_dispatch simulator.
//!
//! The simulation core never formats anything itself.  This crate receives
//! its structured outputs and writes them for external plotting/reporting:
//!
//! | File                | Contents                                            |
//! |---------------------|-----------------------------------------------------|
//! | `events.csv`        | one row per processed event                         |
//! | `vehicles.csv`      | final position, state, and trip count per vehicle   |
//! | `network_edges.csv` | every road once, with endpoint labels and coords    |
//! | `metrics.json`      | the run's [`Metrics`](rd_sim::Metrics)              |
//!
//! [`CsvWriter`] implements [`OutputWriter`] and is driven by
//! [`SimOutputObserver`], which implements `rd_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rd_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.write_final_state(&sim);
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EdgeRow, EventRow, VehicleRow};
pub use writer::OutputWriter;
