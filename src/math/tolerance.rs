use std::cmp::Ordering;

use crate::error::{GeometryError, Result};

/// Epsilon band used for every coordinate comparison in the engine.
///
/// Two values closer than `epsilon` are treated as equal, and a value whose
/// magnitude does not exceed `epsilon` is treated as zero. Tolerances are
/// immutable and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    /// Epsilon used by [`Tolerance::default`].
    pub const DEFAULT_EPSILON: f64 = 1e-9;

    /// Creates a tolerance with the given epsilon.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidTolerance` if `epsilon` is not positive
    /// and finite.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(GeometryError::InvalidTolerance(epsilon).into());
        }
        Ok(Self { epsilon })
    }

    /// Returns the epsilon of this tolerance.
    #[must_use]
    pub fn epsilon(self) -> f64 {
        self.epsilon
    }

    /// Returns the sign of `d`, or 0 when `d` lies within the epsilon band.
    #[must_use]
    pub fn check(self, d: f64) -> i32 {
        if d > self.epsilon {
            1
        } else if d < -self.epsilon {
            -1
        } else {
            0
        }
    }

    /// Returns true if `d` is practically zero.
    #[must_use]
    pub fn is_zero(self, d: f64) -> bool {
        self.check(d) == 0
    }

    /// Returns true if `a` and `b` are equal within epsilon.
    #[must_use]
    pub fn matches(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }

    /// Returns true if both coordinates of the two points match within epsilon.
    #[must_use]
    pub fn matches_xy(self, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
        self.matches(ax, bx) && self.matches(ay, by)
    }

    /// Compares two scalars, treating values within epsilon as equal.
    #[must_use]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self.check(a - b) {
            1 => Ordering::Greater,
            -1 => Ordering::Less,
            _ => Ordering::Equal,
        }
    }

    /// Returns the tighter (smaller epsilon) of the two tolerances.
    #[must_use]
    pub fn most_precise(self, other: Self) -> Self {
        if other.epsilon < self.epsilon {
            other
        } else {
            self
        }
    }

    /// Returns the looser (larger epsilon) of the two tolerances.
    ///
    /// Binary operations on geometry measured with different tolerances use
    /// this so the result never claims more precision than its inputs.
    #[must_use]
    pub fn least_precise(self, other: Self) -> Self {
        if other.epsilon > self.epsilon {
            other
        } else {
            self
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_epsilon() {
        assert!(Tolerance::new(0.0).is_err());
        assert!(Tolerance::new(-1.0).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
    }

    #[test]
    fn check_respects_band() {
        let tol = Tolerance::new(0.1).unwrap();
        assert_eq!(tol.check(0.05), 0);
        assert_eq!(tol.check(-0.1), 0);
        assert_eq!(tol.check(0.2), 1);
        assert_eq!(tol.check(-0.2), -1);
    }

    #[test]
    fn matching_points() {
        let tol = Tolerance::new(0.01).unwrap();
        assert!(tol.matches_xy(1.0, 1.0, 1.005, 0.995));
        assert!(!tol.matches_xy(1.0, 1.0, 1.02, 1.0));
    }

    #[test]
    fn precision_selection() {
        let fine = Tolerance::new(1e-6).unwrap();
        let coarse = Tolerance::new(1e-3).unwrap();
        assert_eq!(fine.least_precise(coarse), coarse);
        assert_eq!(coarse.least_precise(fine), coarse);
        assert_eq!(fine.most_precise(coarse), fine);
    }

    #[test]
    fn compare_collapses_band() {
        let tol = Tolerance::new(0.5).unwrap();
        assert_eq!(tol.compare(1.0, 1.4), Ordering::Equal);
        assert_eq!(tol.compare(1.0, 2.0), Ordering::Less);
        assert_eq!(tol.compare(3.0, 2.0), Ordering::Greater);
    }
}
