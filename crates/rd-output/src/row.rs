//! Plain data row types written by output backends.

use rd_core::Point;
use rd_sim::{EventOutcome, EventRecord, Vehicle};
use rd_spatial::{Road, RoadNetwork};

/// One processed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub time:       f64,
    pub seq:        u64,
    pub kind:       &'static str,
    pub rider_id:   u32,
    /// `None` for requests that were not matched.
    pub vehicle_id: Option<u32>,
    pub outcome:    &'static str,
    /// Scheduled pickup time, for dispatched requests.
    pub pickup_at:  Option<f64>,
    /// Scheduled dropoff time, for dispatched requests.
    pub dropoff_at: Option<f64>,
}

impl From<&EventRecord> for EventRow {
    fn from(r: &EventRecord) -> Self {
        let (pickup_at, dropoff_at) = match r.outcome {
            EventOutcome::Dispatched { pickup_at, dropoff_at } => (Some(pickup_at.0), Some(dropoff_at.0)),
            _ => (None, None),
        };
        EventRow {
            time:       r.time.0,
            seq:        r.seq,
            kind:       r.kind.name(),
            rider_id:   r.rider.0,
            vehicle_id: r.vehicle.map(|v| v.0),
            outcome:    r.outcome.name(),
            pickup_at,
            dropoff_at,
        }
    }
}

/// A vehicle's final state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleRow {
    pub vehicle_id:      u32,
    pub x:               f64,
    pub y:               f64,
    pub state:           &'static str,
    pub completed_trips: u32,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        VehicleRow {
            vehicle_id:      v.id.0,
            x:               v.position.x,
            y:               v.position.y,
            state:           v.state.name(),
            completed_trips: v.completed_trips,
        }
    }
}

/// One undirected road with both endpoints resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub a_label: String,
    pub a:       Point,
    pub b_label: String,
    pub b:       Point,
    pub weight:  f64,
}

impl EdgeRow {
    /// Resolve `road` against `network`.  `None` if an endpoint is unknown.
    pub fn resolve(network: &RoadNetwork, road: &Road) -> Option<Self> {
        Some(EdgeRow {
            a_label: network.node_label(road.a)?.to_owned(),
            a:       network.node_point(road.a)?,
            b_label: network.node_label(road.b)?.to_owned(),
            b:       network.node_point(road.b)?,
            weight:  road.weight,
        })
    }
}
