//! Vehicle and rider state machines.
//!
//! ```text
//! Vehicle: Available ─request─▶ EnRouteToPickup ─pickup─▶ EnRouteToDestination ─dropoff─▶ Available
//! Rider:   Waiting ─pickup─▶ InVehicle ─dropoff─▶ Completed
//!          Waiting ─no vehicle / no route─▶ Dropped
//! ```
//!
//! Only the dispatch loop in [`Sim`](crate::Sim) mutates these.

use std::fmt;

use rd_core::{Point, RiderId, SimTime, VehicleId};

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleState {
    /// Idle and present in the spatial index.
    Available,
    /// Driving to `rider`'s pickup point.
    EnRouteToPickup { rider: RiderId },
    /// Carrying `rider` to their destination.
    EnRouteToDestination { rider: RiderId },
    /// Could not be placed in the spatial index (its position lies outside
    /// the network bounds).  Never matched again.
    Offline,
}

impl VehicleState {
    pub fn name(&self) -> &'static str {
        match self {
            VehicleState::Available                 => "available",
            VehicleState::EnRouteToPickup { .. }      => "en_route_to_pickup",
            VehicleState::EnRouteToDestination { .. } => "en_route_to_destination",
            VehicleState::Offline                   => "offline",
        }
    }

    /// The rider this vehicle is assigned to, if busy.
    pub fn rider(&self) -> Option<RiderId> {
        match *self {
            VehicleState::EnRouteToPickup { rider }
            | VehicleState::EnRouteToDestination { rider } => Some(rider),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id:              VehicleId,
    /// Last known position: the start point, or the pickup / destination of
    /// the most recent stop.
    pub position:        Point,
    pub state:           VehicleState,
    pub completed_trips: u32,
}

impl Vehicle {
    pub fn is_available(&self) -> bool {
        self.state == VehicleState::Available
    }
}

// ── Rider ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiderState {
    Waiting,
    InVehicle,
    Completed,
    /// Not served: no available vehicle, or no route.  Never retried.
    Dropped,
}

impl RiderState {
    pub fn name(&self) -> &'static str {
        match self {
            RiderState::Waiting   => "waiting",
            RiderState::InVehicle => "in_vehicle",
            RiderState::Completed => "completed",
            RiderState::Dropped   => "dropped",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rider {
    pub id:           RiderId,
    pub pickup:       Point,
    pub destination:  Point,
    pub request_time: SimTime,
    pub state:        RiderState,
    pub vehicle:      Option<VehicleId>,
    pub pickup_time:  Option<SimTime>,
    pub dropoff_time: Option<SimTime>,
}

impl Rider {
    pub(crate) fn new(id: RiderId, pickup: Point, destination: Point, request_time: SimTime) -> Self {
        Self {
            id,
            pickup,
            destination,
            request_time,
            state: RiderState::Waiting,
            vehicle: None,
            pickup_time: None,
            dropoff_time: None,
        }
    }

    /// Pickup time minus request time, once picked up.
    pub fn wait_time(&self) -> Option<f64> {
        self.pickup_time.map(|p| p - self.request_time)
    }

    /// Dropoff time minus pickup time, once delivered.
    pub fn trip_duration(&self) -> Option<f64> {
        Some(self.dropoff_time? - self.pickup_time?)
    }
}

// ── CompletedTrip ─────────────────────────────────────────────────────────────

/// Archive record written when a rider is dropped off.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedTrip {
    pub rider:        RiderId,
    pub vehicle:      VehicleId,
    pub request_time: SimTime,
    pub pickup_time:  SimTime,
    pub dropoff_time: SimTime,
}

impl CompletedTrip {
    pub fn wait_time(&self) -> f64 {
        self.pickup_time - self.request_time
    }

    pub fn trip_duration(&self) -> f64 {
        self.dropoff_time - self.pickup_time
    }
}
