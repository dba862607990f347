//! Immutable geometry values.
//!
//! Every kind of geometry is one variant of [`Geometry`], which carries the
//! capabilities shared by all of them: bounds, metrics, transformation,
//! classification, boolean combination and buffering. Empty geometry is
//! never a value; operations that can come out empty return `Option`.

mod area;
mod geo_shape;
mod line_set;
mod line_string;
mod point_set;
mod ring;

pub use area::{Area, Rings};
pub use geo_shape::GeoShape;
pub use line_set::LineSet;
pub use line_string::LineString;
pub use point_set::PointSet;
pub use ring::Ring;

use crate::error::{GeometryError, Result};
use crate::math::{Rect, Tolerance, Transform, Vect};
use crate::operations::boolean::{Difference, Intersection, Union, Xor};
use crate::operations::buffer::Buffer;
use crate::operations::relate::{relate_point, relation, Relate, Relation};
use crate::tessellation::PathIter;

/// Any geometry value.
///
/// A [`Ring`] used as a geometry denotes the region it encloses, whatever
/// its orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geometry {
    Point(Vect),
    LineString(LineString),
    LineSet(LineSet),
    Ring(Ring),
    Area(Area),
    PointSet(PointSet),
    GeoShape(GeoShape),
}

impl Geometry {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Point(p) => Rect::from_point(*p),
            Geometry::LineString(ls) => ls.bounds(),
            Geometry::LineSet(set) => set.bounds(),
            Geometry::Ring(ring) => ring.bounds(),
            Geometry::Area(area) => area.bounds(),
            Geometry::PointSet(set) => set.bounds(),
            Geometry::GeoShape(shape) => shape.bounds(),
        }
    }

    /// Enclosed area; zero for points and lines.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Ring(ring) => ring.area(),
            Geometry::Area(area) => area.area(),
            Geometry::GeoShape(shape) => shape.area().map_or(0.0, Area::area),
            Geometry::Point(_)
            | Geometry::LineString(_)
            | Geometry::LineSet(_)
            | Geometry::PointSet(_) => 0.0,
        }
    }

    /// Total length of lines and area boundaries; zero for points.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Geometry::LineString(ls) => ls.length(),
            Geometry::LineSet(set) => set.length(),
            Geometry::Ring(ring) => ring.length(),
            Geometry::Area(area) => area.length(),
            Geometry::GeoShape(shape) => {
                shape.area().map_or(0.0, Area::length) + shape.lines().map_or(0.0, LineSet::length)
            }
            Geometry::Point(_) | Geometry::PointSet(_) => 0.0,
        }
    }

    /// True if the geometry is well formed under `tolerance`.
    #[must_use]
    pub fn is_valid(&self, tolerance: Tolerance) -> bool {
        match self {
            Geometry::Ring(ring) => ring.is_valid(tolerance),
            Geometry::Area(area) => area.is_valid(tolerance),
            Geometry::GeoShape(shape) => shape.area().is_none_or(|a| a.is_valid(tolerance)),
            Geometry::LineString(ls) => ls.edges().all(|e| e.is_valid(tolerance)),
            Geometry::LineSet(set) => set.edges().all(|e| e.is_valid(tolerance)),
            Geometry::Point(_) | Geometry::PointSet(_) => true,
        }
    }

    /// Maps the geometry through an affine transform.
    ///
    /// # Errors
    ///
    /// Fails if a mapped coordinate overflows or the transform collapses a
    /// part below its minimum number of distinct points.
    pub fn transform(&self, transform: &Transform) -> Result<Geometry> {
        Ok(match self {
            Geometry::Point(p) => Geometry::Point(transform.apply(*p)?),
            Geometry::LineString(ls) => Geometry::LineString(ls.transform(transform)?),
            Geometry::LineSet(set) => Geometry::LineSet(set.transform(transform)?),
            Geometry::Ring(ring) => Geometry::Ring(ring.transform(transform)?),
            Geometry::Area(area) => Geometry::Area(area.transform(transform)?),
            Geometry::PointSet(set) => Geometry::PointSet(set.transform(transform)?),
            Geometry::GeoShape(shape) => Geometry::GeoShape(shape.transform(transform)?),
        })
    }

    /// Classifies a point against this geometry.
    #[must_use]
    pub fn relate(&self, p: Vect, tolerance: Tolerance) -> Relate {
        relate_point(self, p, tolerance)
    }

    /// Mutual relation of this geometry (A) and `other` (B).
    #[must_use]
    pub fn relation(&self, other: &Geometry, tolerance: Tolerance) -> Relation {
        relation(self, other, tolerance)
    }

    #[must_use]
    pub fn union(&self, other: &Geometry, tolerance: Tolerance) -> Option<Geometry> {
        Union::new(self, other).execute(tolerance)
    }

    #[must_use]
    pub fn intersection(&self, other: &Geometry, tolerance: Tolerance) -> Option<Geometry> {
        Intersection::new(self, other).execute(tolerance)
    }

    /// This geometry less `other`.
    #[must_use]
    pub fn less(&self, other: &Geometry, tolerance: Tolerance) -> Option<Geometry> {
        Difference::new(self, other).execute(tolerance)
    }

    #[must_use]
    pub fn xor(&self, other: &Geometry, tolerance: Tolerance) -> Option<Geometry> {
        Xor::new(self, other).execute(tolerance)
    }

    /// Buffers the geometry by `amount` with the default linearizer.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-finite amount.
    pub fn buffer(&self, amount: f64, tolerance: Tolerance) -> Result<Option<Geometry>> {
        Buffer::new(self, amount).execute(tolerance)
    }

    /// Drawing instructions outlining the geometry.
    #[must_use]
    pub fn path(&self) -> PathIter<'_> {
        PathIter::new(self)
    }
}

impl From<Vect> for Geometry {
    fn from(p: Vect) -> Self {
        Geometry::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(ls: LineString) -> Self {
        Geometry::LineString(ls)
    }
}

impl From<LineSet> for Geometry {
    fn from(set: LineSet) -> Self {
        Geometry::LineSet(set)
    }
}

impl From<Ring> for Geometry {
    fn from(ring: Ring) -> Self {
        Geometry::Ring(ring)
    }
}

impl From<Area> for Geometry {
    fn from(area: Area) -> Self {
        Geometry::Area(area)
    }
}

impl From<PointSet> for Geometry {
    fn from(set: PointSet) -> Self {
        Geometry::PointSet(set)
    }
}

impl From<GeoShape> for Geometry {
    fn from(shape: GeoShape) -> Self {
        Geometry::GeoShape(shape)
    }
}

/// Pairs up a flat `x0, y0, x1, y1, ...` list into points.
pub(crate) fn points_from_coords(coords: &[f64]) -> Result<Vec<Vect>> {
    if coords.len() % 2 != 0 {
        return Err(GeometryError::OddCoordinateCount(coords.len()).into());
    }
    coords
        .chunks_exact(2)
        .map(|c| Vect::new(c[0], c[1]))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn odd_coordinate_count() {
        assert!(points_from_coords(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(points_from_coords(&[1.0, 2.0]).unwrap().len(), 1);
    }

    #[test]
    fn metrics_by_variant() {
        let ring = Ring::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 3.0]).unwrap();
        let g = Geometry::from(ring);
        assert_relative_eq!(g.area(), 6.0);
        assert_relative_eq!(g.length(), 12.0);
        let p = Geometry::from(Vect::new(1.0, 1.0).unwrap());
        assert_relative_eq!(p.area(), 0.0);
        assert_relative_eq!(p.bounds().width(), 0.0);
    }

    #[test]
    fn transform_each_variant() {
        let t = Transform::translate(10.0, 0.0);
        let ls = Geometry::from(LineString::from_coords(&[0.0, 0.0, 1.0, 0.0]).unwrap());
        let moved = ls.transform(&t).unwrap();
        assert_relative_eq!(moved.bounds().min_x, 10.0);
        let collapse = Transform::scale(0.0, 0.0);
        assert!(ls.transform(&collapse).is_err());
    }

    #[test]
    fn capabilities_dispatch() {
        let a = Ring::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]).unwrap();
        let b = Ring::from_coords(&[1.0, 0.0, 3.0, 0.0, 3.0, 2.0, 1.0, 2.0]).unwrap();
        let (a, b) = (Geometry::from(a), Geometry::from(b));
        assert_relative_eq!(a.union(&b, tol()).unwrap().area(), 6.0);
        assert_relative_eq!(a.intersection(&b, tol()).unwrap().area(), 2.0);
        assert_relative_eq!(a.less(&b, tol()).unwrap().area(), 2.0);
        assert_relative_eq!(a.xor(&b, tol()).unwrap().area(), 4.0);
        assert!(a.relation(&b, tol()).contains(Relation::TOUCH));
        assert!(a.is_valid(tol()));
    }
}
