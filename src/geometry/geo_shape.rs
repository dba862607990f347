use super::{Area, Geometry, LineSet, PointSet};
use crate::error::Result;
use crate::math::{Rect, Transform};

/// The general result of a geometric operation: at most one area, one line
/// set and one point set, at least one of them present.
///
/// Lines never run through the interior of the area, and points never lie
/// on the area or on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoShape {
    area: Option<Area>,
    lines: Option<LineSet>,
    points: Option<PointSet>,
}

impl GeoShape {
    /// Combines the parts, or returns `None` if all of them are absent.
    #[must_use]
    pub fn value_of(
        area: Option<Area>,
        lines: Option<LineSet>,
        points: Option<PointSet>,
    ) -> Option<Self> {
        if area.is_none() && lines.is_none() && points.is_none() {
            return None;
        }
        Some(Self {
            area,
            lines,
            points,
        })
    }

    #[must_use]
    pub fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    #[must_use]
    pub fn lines(&self) -> Option<&LineSet> {
        self.lines.as_ref()
    }

    #[must_use]
    pub fn points(&self) -> Option<&PointSet> {
        self.points.as_ref()
    }

    /// Keeps only the area part.
    #[must_use]
    pub fn into_area(self) -> Option<Area> {
        self.area
    }

    /// Collapses a single-part shape to the narrowest geometry variant.
    ///
    /// A lone area stays an area, a line set of one line becomes a line
    /// string, and a point set of one point becomes a point. Shapes with
    /// more than one part are returned unchanged.
    #[must_use]
    pub fn into_simplest(self) -> Geometry {
        match (self.area, self.lines, self.points) {
            (Some(area), None, None) => Geometry::Area(area),
            (None, Some(lines), None) => {
                if lines.len() == 1 {
                    Geometry::LineString(lines.lines()[0].clone())
                } else {
                    Geometry::LineSet(lines)
                }
            }
            (None, None, Some(points)) => {
                if points.len() == 1 {
                    Geometry::Point(points.points()[0])
                } else {
                    Geometry::PointSet(points)
                }
            }
            (area, lines, points) => Geometry::GeoShape(Self {
                area,
                lines,
                points,
            }),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        let parts = [
            self.area.as_ref().map(Area::bounds),
            self.lines.as_ref().map(LineSet::bounds),
            self.points.as_ref().map(PointSet::bounds),
        ];
        parts
            .into_iter()
            .flatten()
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Rect::from_point(crate::math::Vect::ZERO))
    }

    /// Maps every part through `transform`.
    ///
    /// # Errors
    ///
    /// Fails if any part fails to transform.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        Ok(Self {
            area: self.area.as_ref().map(|a| a.transform(transform)).transpose()?,
            lines: self.lines.as_ref().map(|l| l.transform(transform)).transpose()?,
            points: self.points.as_ref().map(|p| p.transform(transform)).transpose()?,
        })
    }
}
