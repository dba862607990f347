use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::{boolean_execute, overlay};
use super::select::BooleanOp;

/// Computes the union of two geometries.
pub struct Union<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the union. Returns `None` if the result is empty.
    #[must_use]
    pub fn execute(&self, tolerance: Tolerance) -> Option<Geometry> {
        boolean_execute(self.a, self.b, BooleanOp::Union, tolerance)
    }
}

/// Computes the union of any number of geometries in one overlay pass.
/// Returns `None` if every input is empty.
#[must_use]
pub fn union_all(geometries: &[&Geometry], tolerance: Tolerance) -> Option<Geometry> {
    overlay(geometries, |m| m.iter().any(|&x| x), tolerance)
}
