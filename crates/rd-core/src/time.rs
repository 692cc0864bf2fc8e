//! Logical time model.
//!
//! # Design
//!
//! There is no fixed tick.  Time is a continuous, unit-less `SimTime`
//! advanced only by popping the next event: the clock jumps straight to the
//! event's timestamp.  Edge weights, inter-arrival gaps, and the horizon are
//! all expressed in the same unit.
//!
//! `SimTime` wraps an `f64` but is totally ordered (via `f64::total_cmp`) so
//! it can key a heap or a `BTreeMap` without `partial_cmp` ceremony.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute logical timestamp.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
    pub const NEVER: SimTime = SimTime(f64::INFINITY);

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The run's logical clock.  Monotonically non-decreasing.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Jump to `time`.  Fails if `time` lies in the past.
    pub fn advance_to(&mut self, time: SimTime) -> CoreResult<()> {
        if time < self.now {
            return Err(CoreError::ClockRewind { now: self.now, requested: time });
        }
        self.now = time;
        Ok(())
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.now.fmt(f)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically assembled by the driver from CLI flags or a JSON file and
/// passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Horizon (exclusive).  The first event at or past it ends the run.
    pub max_time: f64,

    /// Mean gap between rider requests (exponential inter-arrival).
    pub mean_arrival_time: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// How many nearest available vehicles are routed per request.
    pub candidate_count: usize,

    /// Points per spatial-index node before it subdivides.
    pub index_capacity: usize,

    /// Run the random rider-arrival process.  Disable to drive the run from
    /// scripted requests only.
    pub generate_demand: bool,
}

impl SimConfig {
    /// The horizon as a timestamp.
    #[inline]
    pub fn end_time(&self) -> SimTime {
        SimTime(self.max_time)
    }

    /// Reject values the dispatch loop cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            return Err(CoreError::Config(format!(
                "max_time must be positive and finite, got {}",
                self.max_time
            )));
        }
        if !(self.mean_arrival_time.is_finite() && self.mean_arrival_time > 0.0) {
            return Err(CoreError::Config(format!(
                "mean_arrival_time must be positive and finite, got {}",
                self.mean_arrival_time
            )));
        }
        if self.candidate_count == 0 {
            return Err(CoreError::Config("candidate_count must be at least 1".into()));
        }
        if self.index_capacity == 0 {
            return Err(CoreError::Config("index_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_time:          50.0,
            mean_arrival_time: 4.0,
            seed:              42,
            candidate_count:   5,
            index_capacity:    4,
            generate_demand:   true,
        }
    }
}
