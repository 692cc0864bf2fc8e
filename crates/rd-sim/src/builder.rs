//! Fluent builder for constructing a [`Sim`].

use tracing::warn;

use rd_core::{Point, SimClock, SimConfig, SimRng, SimTime, VehicleId};
use rd_schedule::EventQueue;
use rd_spatial::{QuadTree, RoadNetwork, Router};

use crate::metrics::Counters;
use crate::{RequestSource, Sim, SimError, SimEvent, SimResult, Vehicle, VehicleState};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — horizon, arrival mean, seed, k, index capacity
/// - [`RoadNetwork`] — must have at least one node
/// - `R: Router` — the routing algorithm (e.g. [`rd_spatial::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                          | Default               |
/// |---------------------------------|-----------------------|
/// | `.vehicles(points)`             | empty fleet           |
/// | `.request_at(t, pickup, dest)`  | no scripted requests  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network, DijkstraRouter)
///     .vehicles([Point::new(0.0, 0.0)])
///     .request_at(0.0, Point::new(0.0, 0.0), Point::new(10.0, 0.0))
///     .build()?;
/// let metrics = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router> {
    config:   SimConfig,
    network:  RoadNetwork,
    router:   R,
    vehicles: Vec<Point>,
    requests: Vec<(f64, Point, Point)>,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, network: RoadNetwork, router: R) -> Self {
        Self {
            config,
            network,
            router,
            vehicles: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Initial vehicle positions.  Vehicles get ids `1..=n` in this order.
    ///
    /// A position outside the network bounds cannot enter the spatial index;
    /// that vehicle starts `Offline` and is reported by
    /// [`Sim::rejected_vehicles`].
    pub fn vehicles(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.vehicles.extend(points);
        self
    }

    /// Schedule a rider request with fixed endpoints.  Scripted requests do
    /// not chain further arrivals; combine with
    /// `SimConfig::generate_demand = false` for a fully scripted run.
    pub fn request_at(mut self, time: f64, pickup: Point, destination: Point) -> Self {
        self.requests.push((time, pickup, destination));
        self
    }

    /// Validate inputs, place the fleet, seed the event queue, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;
        if self.network.is_empty() {
            return Err(SimError::EmptyNetwork);
        }

        // ── Fleet ─────────────────────────────────────────────────────────
        let mut index = QuadTree::new(self.network.bounds(), self.config.index_capacity);
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        let mut rejected = Vec::new();
        for (i, &position) in self.vehicles.iter().enumerate() {
            let id = VehicleId::try_from(i + 1)
                .map_err(|_| SimError::Config(format!("too many vehicles: {}", self.vehicles.len())))?;
            let state = match index.insert(position, id) {
                Ok(()) => VehicleState::Available,
                Err(e) => {
                    warn!(vehicle = %id, error = %e, "initial vehicle rejected");
                    rejected.push(id);
                    VehicleState::Offline
                }
            };
            vehicles.push(Vehicle { id, position, state, completed_trips: 0 });
        }

        // ── Event queue ───────────────────────────────────────────────────
        let mut queue = EventQueue::new();
        for &(time, pickup, destination) in &self.requests {
            if !(time.is_finite() && time >= 0.0) {
                return Err(SimError::Config(format!("request time must be finite and >= 0, got {time}")));
            }
            if !(pickup.is_finite() && destination.is_finite()) {
                return Err(SimError::Config(format!(
                    "request endpoints must be finite, got {pickup} -> {destination}"
                )));
            }
            queue.push(SimTime(time), SimEvent::RiderRequest(RequestSource::Scripted { pickup, destination }));
        }

        let mut rng = SimRng::new(self.config.seed);
        if self.config.generate_demand {
            let first = SimTime::ZERO + rng.exponential(self.config.mean_arrival_time);
            if first < self.config.end_time() {
                queue.push(first, SimEvent::RiderRequest(RequestSource::Generated));
            }
        }

        Ok(Sim {
            clock: SimClock::new(),
            config: self.config,
            rng,
            network: self.network,
            router: self.router,
            index,
            vehicles,
            riders: Vec::new(),
            queue,
            trips: Vec::new(),
            counters: Counters::default(),
            rejected,
            finished: false,
        })
    }
}
