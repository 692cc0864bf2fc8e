//! Planar coordinate types.
//!
//! The simulator works in a flat, unit-less Cartesian plane: map files give
//! node coordinates directly and all distances are Euclidean.  `f64` is used
//! throughout so that coordinates read from a map round-trip exactly.

use std::fmt;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A point in the continuous 2-D coordinate space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Preferred for comparisons (no `sqrt`).
    #[inline]
    pub fn distance_2(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// `true` when both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle given by its min and max corners.
///
/// [`contains`](Self::contains) is closed on every edge, so a rectangle
/// built from the extreme coordinates of a point set contains all of them,
/// including degenerate (zero-width or zero-height) rectangles.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty set.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect { min: first, max: first };
        for p in iter {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Squared distance from `p` to the nearest point of the rectangle
    /// (0 when `p` is inside).  Lower bound for any point stored within.
    pub fn min_distance_2(&self, p: Point) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        dx * dx + dy * dy
    }

    /// The four quadrants split at the center, in the order
    /// `[south-west, south-east, north-west, north-east]`.
    pub fn quadrants(&self) -> [Rect; 4] {
        let c = self.center();
        [
            Rect { min: self.min, max: c },
            Rect { min: Point::new(c.x, self.min.y), max: Point::new(self.max.x, c.y) },
            Rect { min: Point::new(self.min.x, c.y), max: Point::new(c.x, self.max.y) },
            Rect { min: c, max: self.max },
        ]
    }

    /// Index into [`quadrants`](Self::quadrants) of the quadrant owning `p`.
    ///
    /// Points on a split line belong to the east / north side, so every
    /// point of the rectangle maps to exactly one quadrant.
    #[inline]
    pub fn quadrant_of(&self, p: Point) -> usize {
        let c = self.center();
        let east = usize::from(p.x >= c.x);
        let north = usize::from(p.y >= c.y);
        north * 2 + east
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
