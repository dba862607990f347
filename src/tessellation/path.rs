use crate::geometry::{Area, Geometry, LineSet, PointSet};
use crate::math::Vect;

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    MoveTo(Vect),
    LineTo(Vect),
    /// Closes the current sub-path back to its last `MoveTo`.
    Close,
}

/// Lazy sequence of drawing instructions outlining a geometry.
///
/// Rings become closed sub-paths, lines open sub-paths and points lone
/// `MoveTo`s. The iterator is `Clone`, so a path can be replayed from any
/// position.
#[derive(Debug, Clone)]
pub struct PathIter<'a> {
    parts: Vec<(&'a [Vect], bool)>,
    part: usize,
    vertex: usize,
}

impl<'a> PathIter<'a> {
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        let mut parts = Vec::new();
        match geometry {
            Geometry::Point(p) => parts.push((std::slice::from_ref(p), false)),
            Geometry::LineString(ls) => parts.push((ls.vertices(), false)),
            Geometry::LineSet(set) => push_lines(&mut parts, set),
            Geometry::Ring(ring) => parts.push((ring.vertices(), true)),
            Geometry::Area(area) => push_area(&mut parts, area),
            Geometry::PointSet(set) => push_points(&mut parts, set),
            Geometry::GeoShape(shape) => {
                if let Some(area) = shape.area() {
                    push_area(&mut parts, area);
                }
                if let Some(lines) = shape.lines() {
                    push_lines(&mut parts, lines);
                }
                if let Some(points) = shape.points() {
                    push_points(&mut parts, points);
                }
            }
        }
        Self {
            parts,
            part: 0,
            vertex: 0,
        }
    }
}

fn push_area<'a>(parts: &mut Vec<(&'a [Vect], bool)>, area: &'a Area) {
    parts.extend(area.rings().map(|r| (r.vertices(), true)));
}

fn push_lines<'a>(parts: &mut Vec<(&'a [Vect], bool)>, set: &'a LineSet) {
    parts.extend(set.lines().iter().map(|l| (l.vertices(), false)));
}

fn push_points<'a>(parts: &mut Vec<(&'a [Vect], bool)>, set: &'a PointSet) {
    parts.extend(set.points().iter().map(|p| (std::slice::from_ref(p), false)));
}

impl Iterator for PathIter<'_> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<PathSegment> {
        loop {
            let &(points, closed) = self.parts.get(self.part)?;
            let i = self.vertex;
            self.vertex += 1;
            if i < points.len() {
                return Some(if i == 0 {
                    PathSegment::MoveTo(points[0])
                } else {
                    PathSegment::LineTo(points[i])
                });
            }
            self.part += 1;
            self.vertex = 0;
            if closed && i == points.len() {
                return Some(PathSegment::Close);
            }
        }
    }
}
