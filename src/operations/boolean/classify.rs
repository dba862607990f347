use std::borrow::Cow;

use crate::geometry::{Geometry, Ring};
use crate::index::{RTreeIndex, SpatialIndex};
use crate::math::{Line, Rect, Tolerance, Vect};
use crate::operations::relate::{ray_crossings, relate_rings, Relate};
use crate::topology::Network;

/// Classification of one network link against one operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LinkSides {
    /// The region just left of the link is inside the operand's area.
    pub left: bool,
    /// The region just right of the link is inside the operand's area.
    pub right: bool,
    /// The link lies on the operand's area boundary.
    pub boundary: bool,
    /// The link lies on one of the operand's lines.
    pub on_line: bool,
}

impl LinkSides {
    /// True if the link is part of the operand in any dimension.
    pub(crate) fn member(self) -> bool {
        self.left || self.right || self.boundary || self.on_line
    }
}

/// Classification of one network vertex against one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VertexClass {
    pub area: Relate,
    pub on_line: bool,
    pub is_point: bool,
}

impl VertexClass {
    pub(crate) const OUTSIDE: VertexClass = VertexClass {
        area: Relate::Outside,
        on_line: false,
        is_point: false,
    };

    /// True if the vertex is part of the operand in any dimension.
    pub(crate) fn member(self) -> bool {
        self.area != Relate::Outside || self.on_line || self.is_point
    }

    /// True if the vertex lies on the operand's boundary, lines or points.
    pub(crate) fn on_edge(self) -> bool {
        self.area == Relate::Touch || self.on_line || self.is_point
    }
}

/// One input of an overlay: the even-odd region of its rings, its line
/// segments and its isolated points.
#[derive(Debug, Clone)]
pub(crate) struct Operand<'a> {
    rings: Vec<Cow<'a, Ring>>,
    lines: Vec<Line>,
    line_index: RTreeIndex<usize>,
    points: Vec<Vect>,
    bounds: Option<Rect>,
}

impl<'a> Operand<'a> {
    /// Borrows the parts of a geometry.
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        let mut rings = Vec::new();
        let mut lines = Vec::new();
        let mut points = Vec::new();
        collect(geometry, &mut rings, &mut lines, &mut points);
        Self::from_parts(rings, lines, points)
    }

    /// An operand made only of area rings.
    #[must_use]
    pub fn from_rings(rings: Vec<Cow<'a, Ring>>) -> Self {
        Self::from_parts(rings, Vec::new(), Vec::new())
    }

    pub(crate) fn from_parts(
        rings: Vec<Cow<'a, Ring>>,
        lines: Vec<Line>,
        mut points: Vec<Vect>,
    ) -> Self {
        points.sort_unstable();
        points.dedup();
        let bounds = rings
            .iter()
            .map(|r| r.bounds())
            .chain(lines.iter().map(Line::bounds))
            .chain(points.iter().map(|&p| Rect::from_point(p)))
            .reduce(|a, b| a.union(&b));
        let line_index = RTreeIndex::bulk_load(
            lines.iter().enumerate().map(|(i, l)| (l.bounds(), i)).collect(),
        );
        Self {
            rings,
            lines,
            line_index,
            points,
            bounds,
        }
    }

    fn ring_refs(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.rings.iter().map(|r| &**r)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Adds every ring edge, line segment and point to `network`.
    pub(crate) fn add_to(&self, network: &mut Network) {
        for ring in &self.rings {
            network.add_path(ring.vertices(), true);
        }
        for line in &self.lines {
            network.add_link_points(line.a(), line.b());
        }
        for &p in &self.points {
            network.vertex_at_or_insert(p);
        }
    }

    /// Classifies `p` against the even-odd region of the rings.
    pub(crate) fn relate_area(&self, p: Vect, tolerance: Tolerance) -> Relate {
        relate_rings(self.ring_refs(), p, tolerance)
    }

    pub(crate) fn on_line(&self, p: Vect, tolerance: Tolerance) -> bool {
        let mut hit = false;
        let query = Rect::from_point(p).inflate(tolerance.epsilon());
        self.line_index.for_each_interacting(&query, |_, &i| {
            hit = hit || self.lines[i].touches(p, tolerance);
        });
        hit
    }

    pub(crate) fn has_point(&self, p: Vect, tolerance: Tolerance) -> bool {
        let eps = tolerance.epsilon();
        let start = self.points.partition_point(|q| q.x() < p.x() - eps);
        self.points[start..]
            .iter()
            .take_while(|q| q.x() <= p.x() + eps)
            .any(|q| q.matches(p, tolerance))
    }

    pub(crate) fn classify_vertex(&self, p: Vect, tolerance: Tolerance) -> VertexClass {
        VertexClass {
            area: self.relate_area(p, tolerance),
            on_line: self.on_line(p, tolerance),
            is_point: self.has_point(p, tolerance),
        }
    }

    /// Classifies a link of a planar network containing this operand.
    ///
    /// A link whose midpoint touches the boundary finds out which of its
    /// sides is inside by casting a ray from the midpoint along its left
    /// normal. Boundary edges running through the midpoint are not crossed
    /// by that ray; they separate the left side from the right side.
    pub(crate) fn classify_link(&self, link: Line, tolerance: Tolerance) -> LinkSides {
        let m = link.midpoint();
        let on_line = self.on_line(m, tolerance);
        match self.relate_area(m, tolerance) {
            Relate::Inside => LinkSides {
                left: true,
                right: true,
                boundary: false,
                on_line,
            },
            Relate::Outside => LinkSides {
                on_line,
                ..LinkSides::default()
            },
            Relate::Touch => {
                let Ok(normal) = link.delta().left_normal().normalized() else {
                    return LinkSides {
                        boundary: true,
                        on_line,
                        ..LinkSides::default()
                    };
                };
                let (crossings, coincident) =
                    ray_crossings(self.ring_refs(), m, normal, tolerance);
                LinkSides {
                    left: crossings % 2 == 1,
                    right: (crossings + coincident) % 2 == 1,
                    boundary: true,
                    on_line,
                }
            }
        }
    }
}

fn collect<'a>(
    geometry: &'a Geometry,
    rings: &mut Vec<Cow<'a, Ring>>,
    lines: &mut Vec<Line>,
    points: &mut Vec<Vect>,
) {
    match geometry {
        Geometry::Point(p) => points.push(*p),
        Geometry::LineString(ls) => lines.extend(ls.edges()),
        Geometry::LineSet(set) => lines.extend(set.edges()),
        Geometry::Ring(ring) => rings.push(Cow::Borrowed(ring)),
        Geometry::Area(area) => rings.extend(area.rings().map(Cow::Borrowed)),
        Geometry::PointSet(set) => points.extend_from_slice(set.points()),
        Geometry::GeoShape(shape) => {
            if let Some(area) = shape.area() {
                rings.extend(area.rings().map(Cow::Borrowed));
            }
            if let Some(set) = shape.lines() {
                lines.extend(set.edges());
            }
            if let Some(set) = shape.points() {
                points.extend_from_slice(set.points());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn square_operand(x: f64) -> Operand<'static> {
        let ring = Ring::from_coords(&[x, 0.0, x + 10.0, 0.0, x + 10.0, 10.0, x, 10.0]).unwrap();
        Operand::from_rings(vec![Cow::Owned(ring)])
    }

    #[test]
    fn boundary_link_sides() {
        let op = square_operand(0.0);
        let bottom = Line::from_points(v(2.0, 0.0), v(4.0, 0.0));
        let sides = op.classify_link(bottom, tol());
        assert!(sides.boundary && sides.left && !sides.right);
        let sides = op.classify_link(bottom.reversed(), tol());
        assert!(sides.boundary && !sides.left && sides.right);
    }

    #[test]
    fn interior_and_exterior_links() {
        let op = square_operand(0.0);
        let inner = op.classify_link(Line::from_points(v(2.0, 2.0), v(4.0, 4.0)), tol());
        assert!(inner.left && inner.right && !inner.boundary);
        let outer = op.classify_link(Line::from_points(v(20.0, 2.0), v(24.0, 4.0)), tol());
        assert!(!outer.member());
    }

    #[test]
    fn shared_edge_between_rings_cancels() {
        // An edge shared by two rings of one operand has the region on
        // both sides.
        let a = Ring::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]).unwrap();
        let b = Ring::from_coords(&[10.0, 0.0, 20.0, 0.0, 20.0, 10.0, 10.0, 10.0]).unwrap();
        let op = Operand::from_rings(vec![Cow::Owned(a), Cow::Owned(b)]);
        let shared = op.classify_link(Line::from_points(v(10.0, 2.0), v(10.0, 4.0)), tol());
        assert!(shared.boundary);
        assert!(shared.left && shared.right);
    }

    #[test]
    fn vertex_membership() {
        let mut rings = Vec::new();
        let mut lines = Vec::new();
        let mut points = Vec::new();
        let g = Geometry::Point(v(1.0, 1.0));
        collect(&g, &mut rings, &mut lines, &mut points);
        let op = Operand::from_parts(rings, lines, points);
        assert!(op.classify_vertex(v(1.0, 1.0), tol()).is_point);
        assert!(!op.classify_vertex(v(1.0, 2.0), tol()).member());
        assert_eq!(op.classify_vertex(v(1.0, 2.0), tol()), VertexClass::OUTSIDE);
    }
}
