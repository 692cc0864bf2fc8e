//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `SimRng`, seeded once from `SimConfig::seed` and
//! threaded through the dispatch loop by `&mut`.  Every random draw (rider
//! pickup/destination, inter-arrival gap) happens in event order on a single
//! thread, so two runs with the same seed, map, and fleet draw the identical
//! sequence.  The generator is never reseeded mid-run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Point, Rect};

/// Smallest uniform sample used by [`SimRng::exponential`]; keeps `ln` finite.
const MIN_UNIFORM: f64 = 1e-12;

/// Simulation-level RNG: the only source of entropy in a run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Exponentially distributed sample with the given `mean` (inverse
    /// transform: `-mean * ln(U)`).  Returns `f64::INFINITY` for a
    /// non-positive mean, i.e. "never".
    pub fn exponential(&mut self, mean: f64) -> f64 {
        if mean <= 0.0 || !mean.is_finite() {
            return f64::INFINITY;
        }
        let u: f64 = self.0.r#gen();
        -mean * u.max(MIN_UNIFORM).ln()
    }

    /// A point drawn uniformly from `rect`.  Degenerate rectangles are fine:
    /// a zero-width side always yields its single coordinate.
    pub fn point_in(&mut self, rect: &Rect) -> Point {
        let ux: f64 = self.0.r#gen();
        let uy: f64 = self.0.r#gen();
        Point::new(
            rect.min.x + ux * rect.width(),
            rect.min.y + uy * rect.height(),
        )
    }
}
