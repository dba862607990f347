use crate::error::Result;
use crate::math::{Rect, Tolerance, Transform, Vect};

/// A non-empty, sorted set of distinct points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSet {
    points: Vec<Vect>,
}

impl PointSet {
    /// Sorts the points and merges those within `tolerance` of their
    /// predecessor. Returns `None` if there are no points.
    #[must_use]
    pub fn value_of(mut points: Vec<Vect>, tolerance: Tolerance) -> Option<Self> {
        points.sort_unstable();
        let mut kept: Vec<Vect> = Vec::with_capacity(points.len());
        for p in points {
            let duplicate = kept
                .iter()
                .rev()
                .take_while(|q| tolerance.matches(q.x(), p.x()))
                .any(|q| q.matches(p, tolerance));
            if !duplicate {
                kept.push(p);
            }
        }
        (!kept.is_empty()).then_some(Self { points: kept })
    }

    /// Sorted points.
    #[must_use]
    pub fn points(&self) -> &[Vect] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an empty point set is represented by `None`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if some point matches `p` within tolerance.
    #[must_use]
    pub fn contains(&self, p: Vect, tolerance: Tolerance) -> bool {
        let eps = tolerance.epsilon();
        let start = self.points.partition_point(|q| q.x() < p.x() - eps);
        self.points[start..]
            .iter()
            .take_while(|q| q.x() <= p.x() + eps)
            .any(|q| q.matches(p, tolerance))
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points.iter().copied())
            .unwrap_or_else(|| Rect::from_point(Vect::ZERO))
    }

    /// Maps every point through `transform` and re-sorts.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if a mapped point overflows.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        let mut points = self
            .points
            .iter()
            .map(|&p| transform.apply(p))
            .collect::<Result<Vec<_>>>()?;
        points.sort_unstable();
        points.dedup();
        Ok(Self { points })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    #[test]
    fn sorted_and_deduplicated() {
        let set = PointSet::value_of(
            vec![v(2.0, 0.0), v(0.0, 1.0), v(2.0, 1e-12), v(0.0, 1.0)],
            Tolerance::default(),
        )
        .unwrap();
        assert_eq!(set.points(), &[v(0.0, 1.0), v(2.0, 0.0)]);
        assert!(set.contains(v(2.0, 1e-10), Tolerance::default()));
        assert!(!set.contains(v(1.0, 0.0), Tolerance::default()));
    }

    #[test]
    fn empty_is_none() {
        assert!(PointSet::value_of(Vec::new(), Tolerance::default()).is_none());
    }
}
