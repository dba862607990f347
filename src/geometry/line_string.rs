use crate::error::{GeometryError, Result};
use crate::math::{Line, Rect, Tolerance, Transform, Vect};

/// An open polyline of at least two distinct vertices.
///
/// A line string may end where it starts; that does not make it a
/// [`Ring`](super::Ring), it is still a line without interior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineString {
    vertices: Vec<Vect>,
}

impl LineString {
    /// Creates a line string, dropping consecutive duplicate vertices.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than two distinct
    /// vertices remain.
    pub fn new(mut points: Vec<Vect>) -> Result<Self> {
        points.dedup();
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                required: 2,
                found: points.len(),
            }
            .into());
        }
        Ok(Self { vertices: points })
    }

    /// Creates a line string from a flat `x0, y0, x1, y1, ...` list.
    ///
    /// # Errors
    ///
    /// Fails on an odd-length list, a non-finite coordinate, or fewer than
    /// two distinct vertices.
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        Self::new(super::points_from_coords(coords)?)
    }

    /// Creates a line string, or `None` if the points collapse under
    /// `tolerance` to a single vertex.
    #[must_use]
    pub fn value_of(mut points: Vec<Vect>, tolerance: Tolerance) -> Option<Self> {
        points.dedup_by(|b, a| a.matches(*b, tolerance));
        (points.len() >= 2).then_some(Self { vertices: points })
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vect] {
        &self.vertices
    }

    #[must_use]
    pub fn start(&self) -> Vect {
        self.vertices[0]
    }

    #[must_use]
    pub fn end(&self) -> Vect {
        self.vertices[self.vertices.len() - 1]
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    /// Segments in order.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        self.vertices
            .windows(2)
            .map(|w| Line::from_points(w[0], w[1]))
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.edges()
            .map(|e| e.bounds())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Rect::from_point(self.start()))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }

    /// Maps every vertex through `transform`.
    ///
    /// # Errors
    ///
    /// Fails if a mapped vertex overflows or the transform collapses the
    /// line to a point.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        let mapped = self
            .vertices
            .iter()
            .map(|&v| transform.apply(v))
            .collect::<Result<Vec<_>>>()?;
        Self::new(mapped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_and_bounds() {
        let ls = LineString::from_coords(&[0.0, 0.0, 3.0, 4.0, 3.0, 10.0]).unwrap();
        assert_relative_eq!(ls.length(), 11.0);
        let b = ls.bounds();
        assert_relative_eq!(b.max_y, 10.0);
        assert!(!ls.is_closed());
    }

    #[test]
    fn needs_two_distinct_points() {
        assert!(LineString::from_coords(&[1.0, 1.0, 1.0, 1.0]).is_err());
        let p = Vect::new(1.0, 1.0).unwrap();
        let q = Vect::new(1.0 + 1e-12, 1.0).unwrap();
        assert!(LineString::value_of(vec![p, q], Tolerance::default()).is_none());
    }
}
