//! The `Sim` struct and its event loop.

use tracing::{debug, info, warn};

use rd_core::{Point, RiderId, SimClock, SimConfig, SimRng, SimTime, VehicleId};
use rd_schedule::EventQueue;
use rd_spatial::{QuadTree, RoadNetwork, Router};

use crate::metrics::Counters;
use crate::{
    CompletedTrip, EventOutcome, EventRecord, Metrics, RequestSource, Rider, RiderState,
    SimError, SimEvent, SimObserver, SimResult, Vehicle, VehicleState,
};

/// The dispatch simulation.
///
/// `Sim<R>` owns the road network, the spatial index of available vehicles,
/// the fleet and rider tables, the event queue, and the run's single RNG.
/// Nothing else mutates them while the run is in progress.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    pub(crate) config:   SimConfig,
    pub(crate) clock:    SimClock,
    pub(crate) rng:      SimRng,
    pub(crate) network:  RoadNetwork,
    pub(crate) router:   R,
    /// Available vehicles only.
    pub(crate) index:    QuadTree<VehicleId>,
    /// Indexed by `VehicleId - 1`.
    pub(crate) vehicles: Vec<Vehicle>,
    /// Indexed by `RiderId`.
    pub(crate) riders:   Vec<Rider>,
    pub(crate) queue:    EventQueue<SimEvent>,
    pub(crate) trips:    Vec<CompletedTrip>,
    pub(crate) counters: Counters,
    pub(crate) rejected: Vec<VehicleId>,
    pub(crate) finished: bool,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Process events until the queue drains or the horizon is reached, then
    /// report the final metrics.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Metrics> {
        info!(
            vehicles = self.vehicles.len(),
            nodes = self.network.node_count(),
            max_time = self.config.max_time,
            seed = self.config.seed,
            "simulation start"
        );
        while self.step(observer)? {}

        let metrics = self.metrics();
        observer.on_sim_end(&metrics);
        info!(
            now = %self.clock.now(),
            trips = metrics.total_trips,
            riders = metrics.total_riders_generated,
            dropped = metrics.dropped_requests + metrics.unroutable_requests,
            "simulation end"
        );
        Ok(metrics)
    }

    /// Process the next event.  Returns `false` once the run is over: the
    /// queue is empty or the next event lies at or past `max_time` (that
    /// event is discarded unprocessed).
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        if self.finished {
            return Ok(false);
        }
        let Some(event) = self.queue.pop_min() else {
            self.finished = true;
            return Ok(false);
        };
        if event.time >= self.config.end_time() {
            debug!(time = %event.time, "horizon reached");
            self.finished = true;
            return Ok(false);
        }

        self.clock.advance_to(event.time)?;
        let (rider, vehicle, outcome) = match event.payload {
            SimEvent::RiderRequest(source) => self.on_request(source)?,
            SimEvent::PickupArrival { vehicle, rider } => {
                (rider, Some(vehicle), self.on_pickup(vehicle, rider))
            }
            SimEvent::DropoffArrival { vehicle, rider } => {
                (rider, Some(vehicle), self.on_dropoff(vehicle, rider))
            }
        };

        let record = EventRecord {
            time: event.time,
            seq: event.seq,
            kind: event.payload.kind(),
            rider,
            vehicle,
            outcome,
        };
        debug!(
            time = %record.time,
            seq = record.seq,
            kind = %record.kind,
            rider = %record.rider,
            outcome = record.outcome.name(),
            "event"
        );
        observer.on_event(&record);
        Ok(true)
    }

    /// Metrics for the run so far.
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.trips, &self.vehicles, self.counters)
    }

    /// Verify that exactly the `Available` vehicles are in the spatial index.
    pub fn check_invariants(&self) -> SimResult<()> {
        let mut available = 0;
        for v in &self.vehicles {
            let indexed = self.index.contains(&v.id);
            if indexed != v.is_available() {
                return Err(SimError::IndexDesync {
                    vehicle: v.id,
                    state: v.state.name(),
                    indexed,
                });
            }
            available += usize::from(indexed);
        }
        if self.index.len() != available {
            return Err(SimError::IndexSize { indexed: self.index.len(), available });
        }
        Ok(())
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        id.index().checked_sub(1).and_then(|i| self.vehicles.get(i))
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    pub fn rider(&self, id: RiderId) -> Option<&Rider> {
        self.riders.get(id.index())
    }

    pub fn completed_trips(&self) -> &[CompletedTrip] {
        &self.trips
    }

    /// Vehicles whose initial position lay outside the network bounds.
    pub fn rejected_vehicles(&self) -> &[VehicleId] {
        &self.rejected
    }

    /// Number of events still queued.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ── Event handlers ────────────────────────────────────────────────────

    fn on_request(&mut self, source: RequestSource) -> SimResult<(RiderId, Option<VehicleId>, EventOutcome)> {
        let now = self.clock.now();
        let (pickup, destination) = match source {
            RequestSource::Generated => {
                let bounds = self.network.bounds();
                let pickup = self.rng.point_in(&bounds);
                let destination = self.rng.point_in(&bounds);
                (pickup, destination)
            }
            RequestSource::Scripted { pickup, destination } => (pickup, destination),
        };

        let rider_id = RiderId::try_from(self.riders.len())
            .map_err(|_| SimError::Config("rider id space exhausted".into()))?;
        self.riders.push(Rider::new(rider_id, pickup, destination, now));
        self.counters.riders += 1;

        let (vehicle, outcome) = self.dispatch(rider_id, pickup, destination)?;
        match outcome {
            EventOutcome::NoVehicle => {
                self.counters.no_vehicle += 1;
                self.riders[rider_id.index()].state = RiderState::Dropped;
                debug!(rider = %rider_id, "no available vehicle; request dropped");
            }
            EventOutcome::NoRoute => {
                self.counters.no_route += 1;
                self.riders[rider_id.index()].state = RiderState::Dropped;
                warn!(rider = %rider_id, %pickup, %destination, "no route; request dropped");
            }
            _ => {}
        }

        if matches!(source, RequestSource::Generated) {
            let next = now + self.rng.exponential(self.config.mean_arrival_time);
            if next < self.config.end_time() {
                self.queue.push(next, SimEvent::RiderRequest(RequestSource::Generated));
            }
        }
        Ok((rider_id, vehicle, outcome))
    }

    /// Match `rider` to the candidate with the least travel time to the
    /// pickup.  Ties keep the earlier candidate in index order.
    fn dispatch(
        &mut self,
        rider:       RiderId,
        pickup:      Point,
        destination: Point,
    ) -> SimResult<(Option<VehicleId>, EventOutcome)> {
        let candidates = self.index.k_nearest(pickup, self.config.candidate_count);
        if candidates.is_empty() {
            return Ok((None, EventOutcome::NoVehicle));
        }

        let pickup_node = self.network.nearest_node(pickup)?;
        let destination_node = self.network.nearest_node(destination)?;

        let mut best: Option<(VehicleId, Point, f64)> = None;
        for c in &candidates {
            let start = self.network.nearest_node(c.point)?;
            let route = self.router.shortest_path(&self.network, start, pickup_node);
            if !route.is_reachable() {
                continue;
            }
            if best.is_none_or(|(_, _, cost)| route.cost < cost) {
                best = Some((c.item, c.point, route.cost));
            }
        }
        let Some((vehicle, position, to_pickup)) = best else {
            return Ok((None, EventOutcome::NoRoute));
        };

        let ride = self.router.shortest_path(&self.network, pickup_node, destination_node);
        if !ride.is_reachable() {
            return Ok((None, EventOutcome::NoRoute));
        }

        // Leave the index before turning busy.
        if !self.index.remove(position, &vehicle) {
            return Err(SimError::IndexDesync { vehicle, state: "available", indexed: false });
        }
        let slot = vehicle.index() - 1;
        self.vehicles[slot].state = VehicleState::EnRouteToPickup { rider };
        self.riders[rider.index()].vehicle = Some(vehicle);

        let now = self.clock.now();
        let pickup_at = now + to_pickup;
        let dropoff_at = pickup_at + ride.cost;
        self.queue.push(pickup_at, SimEvent::PickupArrival { vehicle, rider });
        self.queue.push(dropoff_at, SimEvent::DropoffArrival { vehicle, rider });

        Ok((Some(vehicle), EventOutcome::Dispatched { pickup_at, dropoff_at }))
    }

    fn on_pickup(&mut self, vehicle: VehicleId, rider: RiderId) -> EventOutcome {
        let Some((vi, ri)) = self.slots(vehicle, rider) else {
            return self.stale(vehicle, rider, "unknown vehicle or rider");
        };
        if self.vehicles[vi].state != (VehicleState::EnRouteToPickup { rider })
            || self.riders[ri].state != RiderState::Waiting
        {
            return self.stale(vehicle, rider, "pickup precondition failed");
        }

        let now = self.clock.now();
        let (v, r) = (&mut self.vehicles[vi], &mut self.riders[ri]);
        v.position = r.pickup;
        v.state = VehicleState::EnRouteToDestination { rider };
        r.state = RiderState::InVehicle;
        r.pickup_time = Some(now);
        EventOutcome::PickedUp
    }

    fn on_dropoff(&mut self, vehicle: VehicleId, rider: RiderId) -> EventOutcome {
        let Some((vi, ri)) = self.slots(vehicle, rider) else {
            return self.stale(vehicle, rider, "unknown vehicle or rider");
        };
        if self.vehicles[vi].state != (VehicleState::EnRouteToDestination { rider })
            || self.riders[ri].state != RiderState::InVehicle
        {
            return self.stale(vehicle, rider, "dropoff precondition failed");
        }

        let now = self.clock.now();
        let (v, r) = (&mut self.vehicles[vi], &mut self.riders[ri]);
        v.position = r.destination;
        v.completed_trips += 1;
        r.state = RiderState::Completed;
        r.dropoff_time = Some(now);
        self.trips.push(CompletedTrip {
            rider,
            vehicle,
            request_time: r.request_time,
            pickup_time: r.pickup_time.unwrap_or(now),
            dropoff_time: now,
        });

        // Mark available, then re-enter the index.
        v.state = VehicleState::Available;
        match self.index.insert(v.position, vehicle) {
            Ok(()) => EventOutcome::DroppedOff,
            Err(e) => {
                v.state = VehicleState::Offline;
                warn!(vehicle = %vehicle, error = %e, "vehicle could not re-enter the index");
                EventOutcome::DroppedOffOffline
            }
        }
    }

    /// Table positions of `vehicle` and `rider`, if both exist.
    fn slots(&self, vehicle: VehicleId, rider: RiderId) -> Option<(usize, usize)> {
        let vi = vehicle.index().checked_sub(1).filter(|&i| i < self.vehicles.len())?;
        let ri = Some(rider.index()).filter(|&i| i < self.riders.len())?;
        Some((vi, ri))
    }

    fn stale(&mut self, vehicle: VehicleId, rider: RiderId, reason: &'static str) -> EventOutcome {
        self.counters.stale += 1;
        warn!(vehicle = %vehicle, rider = %rider, reason, "stale event ignored");
        EventOutcome::Stale
    }
}
