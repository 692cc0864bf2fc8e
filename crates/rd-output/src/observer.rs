//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rd_sim::{EventRecord, Metrics, Sim, SimObserver};
use rd_spatial::Router;

use crate::row::{EdgeRow, EventRow, VehicleRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Events buffered before a batch is handed to the writer.
const EVENT_BATCH: usize = 256;

/// A [`SimObserver`] that streams the event trace to any [`OutputWriter`]
/// and writes the metrics when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error] or call [`finish`][Self::finish].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::with_capacity(EVENT_BATCH),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write the final fleet table and the network edge list for plotting.
    pub fn write_final_state<R: Router>(&mut self, sim: &Sim<R>) {
        let vehicles: Vec<VehicleRow> = sim.vehicles().iter().map(VehicleRow::from).collect();
        let result = self.writer.write_vehicles(&vehicles);
        self.store_err(result);

        let network = sim.network();
        let edges: Vec<EdgeRow> = network
            .roads()
            .iter()
            .filter_map(|road| EdgeRow::resolve(network, road))
            .collect();
        let result = self.writer.write_edges(&edges);
        self.store_err(result);
    }

    /// Flush everything and return the first error seen, if any.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
        self.take_error().map_or(Ok(()), Err)
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, record: &EventRecord) {
        self.pending.push(EventRow::from(record));
        if self.pending.len() >= EVENT_BATCH {
            self.flush_events();
        }
    }

    fn on_sim_end(&mut self, metrics: &Metrics) {
        self.flush_events();
        let result = self.writer.write_metrics(metrics);
        self.store_err(result);
    }
}
