//! The `OutputWriter` trait implemented by backend writers.

use rd_sim::Metrics;

use crate::{EdgeRow, EventRow, OutputResult, VehicleRow};

/// Sink for everything a run hands to reporting.
///
/// Errors are surfaced to the observer, which stores the first one for
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Append a batch of processed events.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write the final fleet table.
    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()>;

    /// Write the road network's edge list.
    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()>;

    fn write_metrics(&mut self, metrics: &Metrics) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
