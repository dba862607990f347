use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the symmetric difference of two geometries.
pub struct Xor<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
}

impl<'a> Xor<'a> {
    /// Creates a new `Xor` operation.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the symmetric difference. Returns `None` if the result is empty.
    #[must_use]
    pub fn execute(&self, tolerance: Tolerance) -> Option<Geometry> {
        boolean_execute(self.a, self.b, BooleanOp::Xor, tolerance)
    }
}
