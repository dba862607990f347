use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use super::{Point2, Tolerance, Vector2};
use crate::error::{GeometryError, Result};

/// Immutable finite 2D point.
///
/// Construction rejects NaN and infinite coordinates, so every `Vect` can be
/// totally ordered (by x, then y) and used as a map key. Negative zero is
/// normalised to positive zero so equal coordinates hash identically.
#[derive(Debug, Clone, Copy)]
pub struct Vect {
    x: f64,
    y: f64,
}

impl Vect {
    /// The origin.
    pub const ZERO: Vect = Vect { x: 0.0, y: 0.0 };

    /// Creates a point.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if either coordinate is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::NonFinite { x, y }.into());
        }
        Ok(Self::raw(x, y))
    }

    /// Builds a point from coordinates already known to be finite.
    pub(crate) fn raw(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite() && y.is_finite());
        Self { x: x + 0.0, y: y + 0.0 }
    }

    #[must_use]
    pub fn x(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(self) -> f64 {
        self.y
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Vect) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Vect) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn length_sq(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn dist_sq(self, other: Vect) -> f64 {
        (self - other).length_sq()
    }

    #[must_use]
    pub fn dist(self, other: Vect) -> f64 {
        (self - other).length()
    }

    /// Angle of this vector from the positive x axis, in `(-pi, pi]`.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns the unit vector in the same direction.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for the zero vector.
    pub fn normalized(self) -> Result<Vect> {
        let len = self.length();
        if len == 0.0 {
            return Err(GeometryError::Degenerate("cannot normalise zero vector".into()).into());
        }
        Ok(Vect::raw(self.x / len, self.y / len))
    }

    /// Left-pointing normal (rotated 90 degrees counter-clockwise).
    #[must_use]
    pub fn left_normal(self) -> Vect {
        Vect::raw(-self.y, self.x)
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, other: Vect) -> Vect {
        Vect::raw((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Linear interpolation towards `other` at parameter `t`.
    #[must_use]
    pub fn lerp(self, other: Vect, t: f64) -> Vect {
        Vect::raw(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Point at distance `dist` from this one in direction `angle`.
    #[must_use]
    pub fn project(self, angle: f64, dist: f64) -> Vect {
        let (sin, cos) = angle.sin_cos();
        Vect::raw(self.x + cos * dist, self.y + sin * dist)
    }

    /// Returns true if both coordinates match within tolerance.
    #[must_use]
    pub fn matches(self, other: Vect, tolerance: Tolerance) -> bool {
        tolerance.matches_xy(self.x, self.y, other.x, other.y)
    }

    /// Total order: by x, then by y.
    #[must_use]
    pub fn compare(self, other: Vect) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Converts to an nalgebra point.
    #[must_use]
    pub fn to_point(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Converts from an nalgebra point.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if the point is not finite.
    pub fn from_point(p: &Point2) -> Result<Vect> {
        Vect::new(p.x, p.y)
    }

    /// Converts to an nalgebra vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

impl PartialEq for Vect {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Ordering::Equal
    }
}

impl Eq for Vect {}

impl PartialOrd for Vect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vect {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl Hash for Vect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl Add for Vect {
    type Output = Vect;

    fn add(self, rhs: Vect) -> Vect {
        Vect::raw(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vect {
    type Output = Vect;

    fn sub(self, rhs: Vect) -> Vect {
        Vect::raw(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vect {
    type Output = Vect;

    fn mul(self, rhs: f64) -> Vect {
        Vect::raw(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vect {
    type Output = Vect;

    fn neg(self) -> Vect {
        Vect::raw(-self.x, -self.y)
    }
}

/// Mutable accumulator with the same arithmetic as [`Vect`].
///
/// Used in hot loops (centroids, arc generation) to avoid validating every
/// intermediate value; the finiteness check happens once in [`VectBuilder::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectBuilder {
    pub x: f64,
    pub y: f64,
}

impl VectBuilder {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn add(&mut self, x: f64, y: f64) -> &mut Self {
        self.x += x;
        self.y += y;
        self
    }

    pub fn sub(&mut self, x: f64, y: f64) -> &mut Self {
        self.x -= x;
        self.y -= y;
        self
    }

    pub fn mul(&mut self, factor: f64) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }

    pub fn div(&mut self, divisor: f64) -> &mut Self {
        self.x /= divisor;
        self.y /= divisor;
        self
    }

    /// Freezes the accumulated value.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if the accumulated value overflowed
    /// or became NaN.
    pub fn build(&self) -> Result<Vect> {
        Vect::new(self.x, self.y)
    }
}

impl From<Vect> for VectBuilder {
    fn from(v: Vect) -> Self {
        Self { x: v.x, y: v.y }
    }
}
