use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the part of one geometry not covered by another.
pub struct Difference<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
}

impl<'a> Difference<'a> {
    /// Creates a new `Difference` operation (A less B).
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the difference. Returns `None` if the result is empty.
    #[must_use]
    pub fn execute(&self, tolerance: Tolerance) -> Option<Geometry> {
        boolean_execute(self.a, self.b, BooleanOp::Difference, tolerance)
    }
}
