//! Simulation events and the trace records emitted for them.

use std::fmt;

use rd_core::{Point, RiderId, SimTime, VehicleId};

// ── Scheduled payloads ────────────────────────────────────────────────────────

/// Where a rider request comes from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RequestSource {
    /// Drawn from the seeded RNG; schedules the next generated request.
    Generated,
    /// Given up front (tests, replays).  Does not chain.
    Scripted { pickup: Point, destination: Point },
}

/// Payload stored in the event queue.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SimEvent {
    RiderRequest(RequestSource),
    PickupArrival { vehicle: VehicleId, rider: RiderId },
    DropoffArrival { vehicle: VehicleId, rider: RiderId },
}

impl SimEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SimEvent::RiderRequest(_)       => EventKind::RiderRequest,
            SimEvent::PickupArrival { .. }  => EventKind::PickupArrival,
            SimEvent::DropoffArrival { .. } => EventKind::DropoffArrival,
        }
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    RiderRequest,
    PickupArrival,
    DropoffArrival,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::RiderRequest   => "rider_request",
            EventKind::PickupArrival  => "pickup_arrival",
            EventKind::DropoffArrival => "dropoff_arrival",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What processing an event did.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventOutcome {
    /// Request matched; pickup and dropoff are scheduled.
    Dispatched { pickup_at: SimTime, dropoff_at: SimTime },
    /// Request dropped: the available fleet was empty.
    NoVehicle,
    /// Request dropped: no candidate could reach the pickup, or the
    /// destination is unreachable from it.
    NoRoute,
    PickedUp,
    /// Trip completed and the vehicle is available again.
    DroppedOff,
    /// Trip completed but the vehicle could not re-enter the spatial index.
    DroppedOffOffline,
    /// Target state changed since scheduling; nothing was done.
    Stale,
}

impl EventOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            EventOutcome::Dispatched { .. } => "dispatched",
            EventOutcome::NoVehicle         => "no_vehicle",
            EventOutcome::NoRoute           => "no_route",
            EventOutcome::PickedUp          => "picked_up",
            EventOutcome::DroppedOff        => "dropped_off",
            EventOutcome::DroppedOffOffline => "dropped_off_offline",
            EventOutcome::Stale             => "stale",
        }
    }
}

/// One processed event, as reported to observers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventRecord {
    pub time:    SimTime,
    pub seq:     u64,
    pub kind:    EventKind,
    pub rider:   RiderId,
    pub vehicle: Option<VehicleId>,
    pub outcome: EventOutcome,
}
