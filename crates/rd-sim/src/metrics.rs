//! End-of-run summary handed to reporting.

use rd_core::VehicleId;

use crate::{CompletedTrip, Vehicle};

/// Completed-trip count for one vehicle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleTrips {
    pub vehicle: VehicleId,
    pub trips:   u32,
}

/// Aggregate results of a run.
///
/// Averages are arithmetic means over completed trips only; with no
/// completed trips they are `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    pub total_trips:            usize,
    pub total_riders_generated: usize,
    /// Requests dropped because no vehicle was available.
    pub dropped_requests:       usize,
    /// Requests dropped because no candidate could route the trip.
    pub unroutable_requests:    usize,
    pub stale_events:           usize,
    pub avg_wait_time:          f64,
    pub avg_trip_duration:      f64,
    /// Sorted by vehicle id.
    pub per_vehicle_trips:      Vec<VehicleTrips>,
}

/// Request-level counters kept by the dispatch loop.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Counters {
    pub riders:     usize,
    pub no_vehicle: usize,
    pub no_route:   usize,
    pub stale:      usize,
}

impl Metrics {
    pub(crate) fn compute(trips: &[CompletedTrip], vehicles: &[Vehicle], counters: Counters) -> Self {
        let (avg_wait_time, avg_trip_duration) = if trips.is_empty() {
            (0.0, 0.0)
        } else {
            let n = trips.len() as f64;
            let wait: f64 = trips.iter().map(CompletedTrip::wait_time).sum();
            let duration: f64 = trips.iter().map(CompletedTrip::trip_duration).sum();
            (wait / n, duration / n)
        };

        let mut per_vehicle_trips: Vec<VehicleTrips> = vehicles
            .iter()
            .map(|v| VehicleTrips { vehicle: v.id, trips: v.completed_trips })
            .collect();
        per_vehicle_trips.sort_by_key(|t| t.vehicle);

        Metrics {
            total_trips: trips.len(),
            total_riders_generated: counters.riders,
            dropped_requests: counters.no_vehicle,
            unroutable_requests: counters.no_route,
            stale_events: counters.stale,
            avg_wait_time,
            avg_trip_duration,
            per_vehicle_trips,
        }
    }

    /// Trips completed by `vehicle`, or `0` for an unknown id.
    pub fn trips_for(&self, vehicle: VehicleId) -> u32 {
        self.per_vehicle_trips
            .binary_search_by_key(&vehicle, |t| t.vehicle)
            .map(|i| self.per_vehicle_trips[i].trips)
            .unwrap_or(0)
    }
}
