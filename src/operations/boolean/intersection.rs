use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the intersection of two geometries.
pub struct Intersection<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
}

impl<'a> Intersection<'a> {
    /// Creates a new `Intersection` operation.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the intersection. Returns `None` if the result is empty.
    #[must_use]
    pub fn execute(&self, tolerance: Tolerance) -> Option<Geometry> {
        boolean_execute(self.a, self.b, BooleanOp::Intersection, tolerance)
    }
}
