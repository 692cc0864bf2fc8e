//! Simulation observer trait for trace collection and reporting.

use crate::{EventRecord, Metrics};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::step`][crate::Sim::step].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct TripPrinter;
///
/// impl SimObserver for TripPrinter {
///     fn on_event(&mut self, record: &EventRecord) {
///         if record.outcome == EventOutcome::DroppedOff {
///             println!("{}: {} delivered", record.time, record.rider);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after each processed event.  Events at or past the horizon
    /// are not processed and not reported.
    fn on_event(&mut self, _record: &EventRecord) {}

    /// Called once when the run ends.
    fn on_sim_end(&mut self, _metrics: &Metrics) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Collects every [`EventRecord`] in processing order.
///
/// Two runs with identical inputs produce equal traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceRecorder {
    pub records: Vec<EventRecord>,
    pub metrics: Option<Metrics>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for TraceRecorder {
    fn on_event(&mut self, record: &EventRecord) {
        self.records.push(*record);
    }

    fn on_sim_end(&mut self, metrics: &Metrics) {
        self.metrics = Some(metrics.clone());
    }
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_event(&mut self, record: &EventRecord) {
        (**self).on_event(record);
    }

    fn on_sim_end(&mut self, metrics: &Metrics) {
        (**self).on_sim_end(metrics);
    }
}
