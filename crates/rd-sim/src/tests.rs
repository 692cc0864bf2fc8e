//! Integration tests for rd-sim.

use rd_core::{CoreError, Point, RiderId, SimConfig, SimTime, VehicleId};
use rd_spatial::{DijkstraRouter, RoadNetwork, RoadNetworkBuilder};

use crate::{
    EventKind, EventOutcome, NoopObserver, RiderState, Sim, SimBuilder, SimError, SimEvent,
    TraceRecorder, VehicleState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const A: Point = Point::new(0.0, 0.0);
const D: Point = Point::new(10.0, 0.0);

/// Scripted-only config: no generated demand.
fn scripted_config(max_time: f64) -> SimConfig {
    SimConfig { max_time, generate_demand: false, ..SimConfig::default() }
}

/// Two nodes A(0,0) and D(10,0) joined by one road of weight 10.
fn line_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let a = b.add_node("A", A);
    let d = b.add_node("D", D);
    b.add_road(a, d, 10.0).unwrap();
    b.build()
}

/// `n × n` lattice with unit spacing and unit weights.
fn grid_network(n: usize) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let mut ids = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            ids.push(b.add_node(&format!("r{r}c{c}"), Point::new(c as f64, r as f64)));
        }
    }
    for r in 0..n {
        for c in 0..n {
            if c + 1 < n {
                b.add_road(ids[r * n + c], ids[r * n + c + 1], 1.0).unwrap();
            }
            if r + 1 < n {
                b.add_road(ids[r * n + c], ids[(r + 1) * n + c], 1.0).unwrap();
            }
        }
    }
    b.build()
}

fn grid_sim(seed: u64, max_time: f64) -> Sim<DijkstraRouter> {
    let config = SimConfig { seed, max_time, mean_arrival_time: 2.0, ..SimConfig::default() };
    SimBuilder::new(config, grid_network(8), DijkstraRouter)
        .vehicles([
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(7.0, 7.0),
        ])
        .build()
        .unwrap()
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn assigns_vehicle_ids_from_one() {
        let sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A, D])
            .build()
            .unwrap();
        let ids: Vec<_> = sim.vehicles().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![VehicleId(1), VehicleId(2)]);
        assert!(sim.vehicles().iter().all(|v| v.state == VehicleState::Available));
        assert_eq!(sim.index.len(), 2);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn empty_network_errors() {
        let result = SimBuilder::new(scripted_config(50.0), RoadNetwork::empty(), DijkstraRouter).build();
        assert!(matches!(result, Err(SimError::EmptyNetwork)));
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { candidate_count: 0, ..SimConfig::default() };
        let result = SimBuilder::new(config, line_network(), DijkstraRouter).build();
        assert!(matches!(result, Err(SimError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn negative_request_time_errors() {
        let result = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .request_at(-1.0, A, D)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn out_of_bounds_vehicle_is_rejected() {
        let sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A, Point::new(100.0, 100.0)])
            .build()
            .unwrap();
        assert_eq!(sim.rejected_vehicles(), &[VehicleId(2)]);
        assert_eq!(sim.vehicle(VehicleId(2)).unwrap().state, VehicleState::Offline);
        assert!(!sim.index.contains(&VehicleId(2)));
        sim.check_invariants().unwrap();
    }

    #[test]
    fn generated_demand_seeds_one_request() {
        let sim = grid_sim(42, 100.0);
        assert_eq!(sim.pending_events(), 1);
        let scripted = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .build()
            .unwrap();
        assert_eq!(scripted.pending_events(), 0);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn single_vehicle_single_rider() {
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        assert_eq!(metrics.total_trips, 1);
        assert_eq!(metrics.total_riders_generated, 1);
        assert_eq!(metrics.avg_wait_time, 0.0);
        assert_eq!(metrics.avg_trip_duration, 10.0);
        assert_eq!(metrics.trips_for(VehicleId(1)), 1);

        let kinds: Vec<_> = trace.records.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::RiderRequest, EventKind::PickupArrival, EventKind::DropoffArrival]
        );
        assert_eq!(
            trace.records[0].outcome,
            EventOutcome::Dispatched { pickup_at: SimTime(0.0), dropoff_at: SimTime(10.0) }
        );
        assert_eq!(trace.records[2].time, SimTime(10.0));
        assert_eq!(trace.metrics.as_ref(), Some(&metrics));

        let rider = sim.rider(RiderId(0)).unwrap();
        assert_eq!(rider.state, RiderState::Completed);
        assert_eq!(rider.vehicle, Some(VehicleId(1)));
        assert_eq!(rider.wait_time(), Some(0.0));
        assert_eq!(rider.trip_duration(), Some(10.0));

        let vehicle = sim.vehicle(VehicleId(1)).unwrap();
        assert_eq!(vehicle.position, D);
        assert_eq!(vehicle.state, VehicleState::Available);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn no_vehicles_drops_rider() {
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .request_at(1.0, A, D)
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        assert_eq!(metrics.total_trips, 0);
        assert_eq!(metrics.total_riders_generated, 1);
        assert_eq!(metrics.dropped_requests, 1);
        assert_eq!(metrics.avg_wait_time, 0.0);
        assert_eq!(metrics.avg_trip_duration, 0.0);
        assert!(metrics.per_vehicle_trips.is_empty());
        assert_eq!(trace.records.len(), 1);
        assert_eq!(trace.records[0].outcome, EventOutcome::NoVehicle);
        assert_eq!(sim.rider(RiderId(0)).unwrap().state, RiderState::Dropped);
    }

    #[test]
    fn vehicle_is_reused() {
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .request_at(20.0, D, A)
            .build()
            .unwrap();
        let metrics = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(metrics.total_trips, 2);
        assert_eq!(metrics.trips_for(VehicleId(1)), 2);
        assert_eq!(sim.vehicle(VehicleId(1)).unwrap().completed_trips, 2);
        assert_eq!(sim.vehicle(VehicleId(1)).unwrap().position, A);
        assert!(sim.completed_trips().iter().all(|t| t.vehicle == VehicleId(1)));
    }

    #[test]
    fn busy_vehicle_is_not_matched() {
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .request_at(1.0, A, D)
            .build()
            .unwrap();
        let metrics = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(metrics.total_trips, 1);
        assert_eq!(metrics.dropped_requests, 1);
        assert_eq!(sim.rider(RiderId(1)).unwrap().state, RiderState::Dropped);
    }

    #[test]
    fn least_travel_time_wins_over_straight_line_distance() {
        // Vehicle 1 is closer as the crow flies but sits behind a slow road.
        let mut b = RoadNetworkBuilder::new();
        let p = b.add_node("P", Point::new(0.0, 0.0));
        let a = b.add_node("A", Point::new(1.0, 0.0));
        let c = b.add_node("B", Point::new(3.0, 0.0));
        b.add_road(a, p, 100.0).unwrap();
        b.add_road(c, p, 1.0).unwrap();

        let mut sim = SimBuilder::new(scripted_config(50.0), b.build(), DijkstraRouter)
            .vehicles([Point::new(1.0, 0.0), Point::new(3.0, 0.0)])
            .request_at(0.0, Point::new(0.0, 0.0), Point::new(0.0, 0.0))
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        sim.run(&mut trace).unwrap();

        assert_eq!(trace.records[0].vehicle, Some(VehicleId(2)));
        assert_eq!(
            trace.records[0].outcome,
            EventOutcome::Dispatched { pickup_at: SimTime(1.0), dropoff_at: SimTime(1.0) }
        );
    }

    #[test]
    fn unroutable_requests_are_dropped() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node("A", Point::new(0.0, 0.0));
        let bb = b.add_node("B", Point::new(1.0, 0.0));
        let c = b.add_node("C", Point::new(10.0, 0.0));
        let d = b.add_node("D", Point::new(11.0, 0.0));
        b.add_road(a, bb, 1.0).unwrap();
        b.add_road(c, d, 1.0).unwrap();

        let mut sim = SimBuilder::new(scripted_config(50.0), b.build(), DijkstraRouter)
            .vehicles([Point::new(0.0, 0.0)])
            // Vehicle cannot reach the pickup.
            .request_at(1.0, Point::new(10.0, 0.0), Point::new(11.0, 0.0))
            // Pickup reachable, destination is not.
            .request_at(2.0, Point::new(1.0, 0.0), Point::new(11.0, 0.0))
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        assert_eq!(metrics.unroutable_requests, 2);
        assert_eq!(metrics.total_trips, 0);
        assert!(trace.records.iter().all(|r| r.outcome == EventOutcome::NoRoute));
        assert_eq!(sim.vehicle(VehicleId(1)).unwrap().state, VehicleState::Available);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn vehicle_left_off_the_map_goes_offline() {
        // The destination snaps to D but the vehicle stops at the rider's
        // own point (20,0), outside the index bounds.
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, Point::new(20.0, 0.0))
            .request_at(30.0, A, D)
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        let outcomes: Vec<_> = trace.records.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                EventOutcome::Dispatched { pickup_at: SimTime(0.0), dropoff_at: SimTime(10.0) },
                EventOutcome::PickedUp,
                EventOutcome::DroppedOffOffline,
                EventOutcome::NoVehicle,
            ]
        );
        let vehicle = sim.vehicle(VehicleId(1)).unwrap();
        assert_eq!(vehicle.state, VehicleState::Offline);
        assert_eq!(vehicle.position, Point::new(20.0, 0.0));
        assert!(!sim.index.contains(&VehicleId(1)));
        assert_eq!(metrics.total_trips, 1);
        assert_eq!(metrics.dropped_requests, 1);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn events_at_horizon_are_not_processed() {
        let mut sim = SimBuilder::new(scripted_config(5.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .build()
            .unwrap();
        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        // Dropoff at t=10 lies past the horizon.
        assert_eq!(trace.records.len(), 2);
        assert_eq!(metrics.total_trips, 0);
        assert!(sim.is_finished());
        assert_eq!(
            sim.vehicle(VehicleId(1)).unwrap().state,
            VehicleState::EnRouteToDestination { rider: RiderId(0) }
        );
        assert!(sim.now() < SimTime(5.0));
    }

    #[test]
    fn request_exactly_at_horizon_is_discarded() {
        let mut sim = SimBuilder::new(scripted_config(5.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(5.0, A, D)
            .build()
            .unwrap();
        let metrics = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(metrics.total_riders_generated, 0);
        assert!(!sim.step(&mut NoopObserver).unwrap());
    }
}

// ── Stale-event policy ────────────────────────────────────────────────────────

#[cfg(test)]
mod stale_tests {
    use super::*;

    #[test]
    fn mismatched_arrivals_are_ignored() {
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .build()
            .unwrap();
        let vehicle = VehicleId(1);
        let rider = RiderId(0);
        // A second pickup while the vehicle is carrying the rider, and a
        // second dropoff after the trip is complete.
        sim.queue.push(SimTime(5.0), SimEvent::PickupArrival { vehicle, rider });
        sim.queue.push(SimTime(15.0), SimEvent::DropoffArrival { vehicle, rider });
        // Unknown rider.
        sim.queue.push(SimTime(16.0), SimEvent::PickupArrival { vehicle, rider: RiderId(9) });

        let mut trace = TraceRecorder::new();
        let metrics = sim.run(&mut trace).unwrap();

        assert_eq!(metrics.total_trips, 1);
        assert_eq!(metrics.stale_events, 3);
        assert_eq!(sim.vehicle(vehicle).unwrap().completed_trips, 1);
        let stale: Vec<_> = trace
            .records
            .iter()
            .filter(|r| r.outcome == EventOutcome::Stale)
            .map(|r| r.time)
            .collect();
        assert_eq!(stale, vec![SimTime(5.0), SimTime(15.0), SimTime(16.0)]);
        sim.check_invariants().unwrap();
    }
}

// ── Invariant checks ──────────────────────────────────────────────────────────

#[cfg(test)]
mod invariant_tests {
    use super::*;

    fn two_vehicle_sim() -> Sim<DijkstraRouter> {
        SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A, D])
            .build()
            .unwrap()
    }

    #[test]
    fn available_vehicle_missing_from_index_is_a_desync() {
        let mut sim = two_vehicle_sim();
        assert!(sim.index.remove(D, &VehicleId(2)));
        let result = sim.check_invariants();
        assert!(matches!(
            result,
            Err(SimError::IndexDesync { vehicle: VehicleId(2), indexed: false, .. })
        ));
    }

    #[test]
    fn stray_index_entry_is_a_size_mismatch() {
        let mut sim = two_vehicle_sim();
        sim.index.insert(A, VehicleId(9)).unwrap();
        let result = sim.check_invariants();
        assert!(matches!(result, Err(SimError::IndexSize { indexed: 3, available: 2 })));
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics_tests {
    use super::*;

    #[test]
    fn averages_are_means_over_completed_trips() {
        // Trip 1: wait 0, ride 10 (ends at D, t=10).
        // Trip 2: requested at A at t=12, vehicle drives D→A: wait 10, ride 10.
        let mut sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A])
            .request_at(0.0, A, D)
            .request_at(12.0, A, D)
            .build()
            .unwrap();
        let metrics = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(metrics.total_trips, 2);
        assert_eq!(metrics.avg_wait_time, 5.0);
        assert_eq!(metrics.avg_trip_duration, 10.0);

        let waits: Vec<f64> = sim.completed_trips().iter().map(|t| t.wait_time()).collect();
        assert_eq!(waits, vec![0.0, 10.0]);
        assert_eq!(sim.completed_trips()[1].dropoff_time, SimTime(32.0));
    }

    #[test]
    fn zero_trips_yield_zero_metrics() {
        let sim = SimBuilder::new(scripted_config(50.0), line_network(), DijkstraRouter)
            .vehicles([A, D])
            .build()
            .unwrap();
        let metrics = sim.metrics();
        assert_eq!(metrics.total_trips, 0);
        assert_eq!(metrics.avg_wait_time, 0.0);
        assert_eq!(metrics.avg_trip_duration, 0.0);
        assert_eq!(metrics.per_vehicle_trips.len(), 2);
        assert!(metrics.per_vehicle_trips.iter().all(|t| t.trips == 0));
        assert_eq!(metrics.trips_for(VehicleId(7)), 0);
    }
}

// ── Determinism & invariants under generated demand ───────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn same_seed_same_trace() {
        let mut t1 = TraceRecorder::new();
        let mut t2 = TraceRecorder::new();
        let m1 = grid_sim(7, 200.0).run(&mut t1).unwrap();
        let m2 = grid_sim(7, 200.0).run(&mut t2).unwrap();
        assert!(!t1.records.is_empty());
        assert_eq!(t1, t2);
        assert_eq!(m1, m2);
    }

    #[test]
    fn different_seed_different_trace() {
        let mut t1 = TraceRecorder::new();
        let mut t2 = TraceRecorder::new();
        grid_sim(1, 200.0).run(&mut t1).unwrap();
        grid_sim(2, 200.0).run(&mut t2).unwrap();
        assert_ne!(t1.records, t2.records);
    }

    #[test]
    fn index_tracks_available_vehicles_at_every_step() {
        let mut sim = grid_sim(99, 300.0);
        sim.check_invariants().unwrap();
        let mut steps = 0;
        while sim.step(&mut NoopObserver).unwrap() {
            sim.check_invariants().unwrap();
            steps += 1;
        }
        assert!(steps > 0);
    }

    #[test]
    fn trace_is_time_ordered_and_within_horizon() {
        let mut trace = TraceRecorder::new();
        let metrics = grid_sim(3, 150.0).run(&mut trace).unwrap();
        assert!(trace.records.windows(2).all(|w| (w[0].time, w[0].seq) < (w[1].time, w[1].seq)));
        assert!(trace.records.iter().all(|r| r.time < SimTime(150.0)));
        assert_eq!(
            metrics.total_riders_generated,
            trace.records.iter().filter(|r| r.kind == EventKind::RiderRequest).count()
        );
    }

    #[test]
    fn generated_riders_lie_within_network_bounds() {
        let mut sim = grid_sim(11, 200.0);
        sim.run(&mut NoopObserver).unwrap();
        let bounds = sim.network().bounds();
        assert!(!sim.riders().is_empty());
        for r in sim.riders() {
            assert!(bounds.contains(r.pickup));
            assert!(bounds.contains(r.destination));
        }
    }
}
