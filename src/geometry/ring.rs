use std::fmt;
use std::sync::OnceLock;

use crate::error::{GeometryError, Result};
use crate::index::{RTreeIndex, SpatialIndex};
use crate::math::{polygon_2d, Line, Rect, Tolerance, Transform, Vect};
use crate::operations::relate::{relate_ring, Relate};

/// Values derived from the vertex loop, computed on first use.
#[derive(Debug, Clone, Copy)]
struct RingMetrics {
    bounds: Rect,
    signed_area: f64,
    length: f64,
    centroid: Vect,
}

/// A closed polygon boundary of at least three distinct vertices.
///
/// The closing vertex is implicit: the last vertex connects back to the
/// first. Orientation is significant. A counter-clockwise ring (positive
/// signed area) is a shell, a clockwise ring is a hole, so the interior of an
/// [`Area`](super::Area) always lies to the left of its rings.
///
/// Bounds, area, length, centroid and an edge index are computed lazily and
/// cached; the ring itself is immutable.
#[derive(Clone)]
pub struct Ring {
    vertices: Vec<Vect>,
    metrics: OnceLock<RingMetrics>,
    edge_index: OnceLock<RTreeIndex<usize>>,
}

impl Ring {
    /// Creates a ring from a vertex loop.
    ///
    /// A repeated closing vertex and consecutive duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than three distinct
    /// vertices remain.
    pub fn new(points: Vec<Vect>) -> Result<Self> {
        let vertices = dedup_loop(points, |a, b| a == b);
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                required: 3,
                found: vertices.len(),
            }
            .into());
        }
        Ok(Self::from_loop(vertices))
    }

    /// Creates a ring from a flat `x0, y0, x1, y1, ...` coordinate list.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::OddCoordinateCount` for an odd-length list,
    /// `GeometryError::NonFinite` for a non-finite coordinate, and
    /// `GeometryError::TooFewPoints` as for [`Ring::new`].
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        Self::new(super::points_from_coords(coords)?)
    }

    /// Creates a ring, or `None` if the points collapse under `tolerance`
    /// to fewer than three vertices or to zero area.
    #[must_use]
    pub fn value_of(points: Vec<Vect>, tolerance: Tolerance) -> Option<Self> {
        let vertices = dedup_loop(points, |a, b| a.matches(b, tolerance));
        if vertices.len() < 3 {
            return None;
        }
        let ring = Self::from_loop(vertices);
        (tolerance.check(ring.signed_area()) != 0).then_some(ring)
    }

    pub(crate) fn from_loop(vertices: Vec<Vect>) -> Self {
        Self {
            vertices,
            metrics: OnceLock::new(),
            edge_index: OnceLock::new(),
        }
    }

    /// Vertices without the closing repeat.
    #[must_use]
    pub fn vertices(&self) -> &[Vect] {
        &self.vertices
    }

    /// Number of vertices, which equals the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a ring has at least three vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the vertex at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::IndexOutOfRange` if `index >= len()`.
    pub fn vertex(&self, index: usize) -> Result<Vect> {
        self.vertices.get(index).copied().ok_or_else(|| {
            GeometryError::IndexOutOfRange {
                index,
                len: self.vertices.len(),
            }
            .into()
        })
    }

    /// Returns the edge starting at vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::IndexOutOfRange` if `index >= len()`.
    pub fn edge(&self, index: usize) -> Result<Line> {
        let a = self.vertex(index)?;
        Ok(Line::from_points(a, self.vertices[(index + 1) % self.len()]))
    }

    /// Edges in order, the last one closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Line::from_points(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn metrics(&self) -> &RingMetrics {
        self.metrics.get_or_init(|| RingMetrics {
            bounds: Rect::from_points(self.vertices.iter().copied())
                .unwrap_or_else(|| Rect::from_point(Vect::ZERO)),
            signed_area: polygon_2d::signed_area(&self.vertices),
            length: polygon_2d::perimeter(&self.vertices),
            centroid: polygon_2d::centroid(&self.vertices),
        })
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.metrics().bounds
    }

    /// Positive for counter-clockwise rings, negative for clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.metrics().signed_area
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Perimeter length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.metrics().length
    }

    #[must_use]
    pub fn centroid(&self) -> Vect {
        self.metrics().centroid
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Index of edges by bounds, built on first use.
    pub(crate) fn edge_index(&self) -> &RTreeIndex<usize> {
        self.edge_index.get_or_init(|| {
            RTreeIndex::bulk_load(self.edges().enumerate().map(|(i, e)| (e.bounds(), i)).collect())
        })
    }

    /// Same loop traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self::from_loop(polygon_2d::rotate_to_canonical_start(&vertices))
    }

    /// Returns this ring, reversed if needed so that it is counter-clockwise
    /// when `ccw` is set and clockwise otherwise.
    #[must_use]
    pub fn with_orientation(self, ccw: bool) -> Self {
        if self.is_ccw() == ccw {
            self
        } else {
            self.reversed()
        }
    }

    /// Classifies a point against the region enclosed by this ring,
    /// regardless of orientation.
    #[must_use]
    pub fn relate(&self, p: Vect, tolerance: Tolerance) -> Relate {
        relate_ring(self, p, tolerance)
    }

    /// A point strictly inside the ring.
    ///
    /// A horizontal scan line is placed midway across the widest gap between
    /// vertex heights, and the midpoint of the widest interior interval along
    /// it is returned.
    #[must_use]
    pub fn interior_point(&self) -> Vect {
        let mut ys: Vec<f64> = self.vertices.iter().map(|v| v.y()).collect();
        ys.sort_by(f64::total_cmp);
        ys.dedup();
        let scan_y = ys
            .windows(2)
            .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])))
            .map_or(ys[0], |w| (w[0] + w[1]) * 0.5);

        let mut xs: Vec<f64> = self
            .edges()
            .filter(|e| (e.a().y() > scan_y) != (e.b().y() > scan_y))
            .map(|e| {
                let t = (scan_y - e.a().y()) / (e.b().y() - e.a().y());
                e.a().x() + t * (e.b().x() - e.a().x())
            })
            .collect();
        xs.sort_by(f64::total_cmp);
        let best = xs
            .chunks_exact(2)
            .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])));
        match best {
            Some(pair) => Vect::raw((pair[0] + pair[1]) * 0.5, scan_y),
            None => self.centroid(),
        }
    }

    /// True if the ring has at least three distinct vertices, encloses a
    /// non-zero area and no two of its edges meet except consecutive edges
    /// at their shared vertex.
    #[must_use]
    pub fn is_valid(&self, tolerance: Tolerance) -> bool {
        let n = self.len();
        if n < 3 || tolerance.check(self.signed_area()) == 0 {
            return false;
        }
        let edges: Vec<Line> = self.edges().collect();
        if edges.iter().any(|e| !e.is_valid(tolerance)) {
            return false;
        }
        let eps = tolerance.epsilon();
        let index = self.edge_index();
        for (i, edge) in edges.iter().enumerate() {
            let mut clean = true;
            index.for_each_interacting(&edge.bounds().inflate(eps), |_, &j| {
                if j <= i || !clean {
                    return;
                }
                let other = &edges[j];
                clean = if j == i + 1 {
                    !edge.touches(other.b(), tolerance) && !other.touches(edge.a(), tolerance)
                } else if i == 0 && j == n - 1 {
                    !edge.touches(other.a(), tolerance) && !other.touches(edge.b(), tolerance)
                } else {
                    edge.intersection_segment(other, tolerance).is_none()
                        && !edge.touches(other.a(), tolerance)
                        && !edge.touches(other.b(), tolerance)
                        && !other.touches(edge.a(), tolerance)
                        && !other.touches(edge.b(), tolerance)
                };
            });
            if !clean {
                return false;
            }
        }
        true
    }

    /// Maps every vertex through `transform`, keeping the vertex order.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if a mapped vertex overflows and
    /// `GeometryError::TooFewPoints` if the transform collapses vertices.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        let mapped = self
            .vertices
            .iter()
            .map(|&v| transform.apply(v))
            .collect::<Result<Vec<_>>>()?;
        Self::new(mapped)
    }
}

/// Drops a repeated closing vertex and consecutive duplicates.
fn dedup_loop(mut points: Vec<Vect>, same: impl Fn(Vect, Vect) -> bool) -> Vec<Vect> {
    points.dedup_by(|b, a| same(*a, *b));
    while points.len() > 1 && same(points[0], points[points.len() - 1]) {
        points.pop();
    }
    points
}

impl PartialEq for Ring {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for Ring {}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("vertices", &self.vertices)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    fn square() -> Ring {
        Ring::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn closing_vertex_is_implicit() {
        let ring = square();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.edges().count(), 4);
        assert_eq!(ring.edge(3).unwrap().b(), v(0.0, 0.0));
    }

    #[test]
    fn too_few_points() {
        assert!(Ring::from_coords(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]).is_err());
        assert!(Ring::from_coords(&[0.0, 0.0, 1.0]).is_err());
        assert!(Ring::from_coords(&[0.0, 0.0, f64::NAN, 0.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn index_out_of_range() {
        assert!(square().vertex(4).is_err());
        assert!(square().edge(7).is_err());
    }

    #[test]
    fn value_of_rejects_collapsed_rings() {
        let flat = vec![v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)];
        assert!(Ring::value_of(flat, Tolerance::default()).is_none());
        let tiny = vec![v(0.0, 0.0), v(1e-12, 0.0), v(0.0, 1e-12)];
        assert!(Ring::value_of(tiny, Tolerance::default()).is_none());
    }

    #[test]
    fn metrics() {
        let ring = square();
        assert_relative_eq!(ring.signed_area(), 100.0);
        assert_relative_eq!(ring.length(), 40.0);
        assert_relative_eq!(ring.centroid().x(), 5.0);
        assert_eq!(ring.bounds().max_x, 10.0);
        assert!(ring.is_ccw());
        assert_relative_eq!(ring.reversed().signed_area(), -100.0);
    }

    #[test]
    fn interior_point_of_concave_ring() {
        let ring = Ring::from_coords(&[
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 8.0, 10.0, 8.0, 2.0, 2.0, 2.0, 2.0, 10.0, 0.0, 10.0,
        ])
        .unwrap();
        let p = ring.interior_point();
        assert_eq!(ring.relate(p, Tolerance::default()), Relate::Inside);
    }

    #[test]
    fn validity() {
        let tol = Tolerance::default();
        assert!(square().is_valid(tol));
        let bowtie = Ring::from_coords(&[0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 0.0, 10.0]).unwrap();
        assert!(!bowtie.is_valid(tol));
        let spike = Ring::from_coords(&[0.0, 0.0, 10.0, 0.0, 5.0, 0.0, 5.0, 5.0]).unwrap();
        assert!(!spike.is_valid(tol));
    }

    #[test]
    fn transform_keeps_order() {
        let moved = square().transform(&Transform::translate(1.0, 2.0)).unwrap();
        assert_eq!(moved.vertices()[0], v(1.0, 2.0));
        assert_relative_eq!(moved.signed_area(), 100.0);
    }
}
