use std::f64::consts::FRAC_PI_2;

use crate::error::{OperationError, Result};
use crate::math::Vect;

/// How circular arcs are approximated by straight segments.
///
/// Arc vertices lie on a fixed angular grid measured from the positive x
/// axis, so arcs around the same centre with the same radius share their
/// interior vertices exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Linearizer {
    /// Largest allowed distance between an arc and its chords.
    Flatness(f64),
    /// Fixed number of segments per quarter turn.
    SegmentsPerQuadrant(u32),
}

impl Default for Linearizer {
    fn default() -> Self {
        Self::SegmentsPerQuadrant(8)
    }
}

impl Linearizer {
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` unless `flatness` is positive
    /// and finite.
    pub fn with_flatness(flatness: f64) -> Result<Self> {
        let l = Self::Flatness(flatness);
        l.validate()?;
        Ok(l)
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `segments` is zero.
    pub fn with_segments_per_quadrant(segments: u32) -> Result<Self> {
        let l = Self::SegmentsPerQuadrant(segments);
        l.validate()?;
        Ok(l)
    }

    /// Checks the setting.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive or
    /// non-finite flatness, or zero segments per quadrant.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Flatness(f) if !(f.is_finite() && f > 0.0) => Err(OperationError::InvalidInput(
                format!("flatness must be positive and finite, got {f}"),
            )
            .into()),
            Self::SegmentsPerQuadrant(0) => Err(OperationError::InvalidInput(
                "segments per quadrant must be at least 1".to_owned(),
            )
            .into()),
            _ => Ok(()),
        }
    }

    /// Number of segments per quarter turn for arcs of `radius`.
    #[must_use]
    pub fn segments_per_quadrant(&self, radius: f64) -> u32 {
        match *self {
            Self::Flatness(f) => arc_subdivision_count(radius, FRAC_PI_2, f),
            Self::SegmentsPerQuadrant(n) => n.max(1),
        }
    }

    /// Points along the arc of `radius` around `center`, turning
    /// counter-clockwise by `sweep` radians from the direction `start`.
    ///
    /// Both end points are included. Interior points sit on the angular
    /// grid.
    #[must_use]
    pub fn arc(&self, center: Vect, radius: f64, start: f64, sweep: f64) -> Vec<Vect> {
        let per_quadrant = self.segments_per_quadrant(radius);
        let full = 4 * per_quadrant;
        let step = FRAC_PI_2 / f64::from(per_quadrant);
        let margin = step * 1e-3;
        let end = start + sweep;

        let mut points = vec![center.project(start, radius)];
        let mut k = ((start + margin) / step).ceil();
        while k * step < end - margin {
            points.push(center.project(grid_angle(k, full, step), radius));
            k += 1.0;
        }
        points.push(center.project(end, radius));
        points
    }

    /// Closed loop of grid points approximating a full circle.
    #[must_use]
    pub fn circle(&self, center: Vect, radius: f64) -> Vec<Vect> {
        let per_quadrant = self.segments_per_quadrant(radius);
        let full = 4 * per_quadrant;
        let step = FRAC_PI_2 / f64::from(per_quadrant);
        (0..full)
            .map(|k| center.project(f64::from(k) * step, radius))
            .collect()
    }
}

/// Grid angle `k * step` reduced to one turn, so equal directions reached
/// from different starting angles give bit-identical points.
#[allow(clippy::cast_possible_truncation)]
fn grid_angle(k: f64, full: u32, step: f64) -> f64 {
    let k = (k as i64).rem_euclid(i64::from(full));
    #[allow(clippy::cast_precision_loss)]
    let k = k as f64;
    k * step
}

/// Number of chords needed to keep the sagitta of an arc of `abs_sweep`
/// radians within `tolerance`.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // sagitta = r * (1 - cos(theta / 2))
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn rejects_bad_settings() {
        assert!(Linearizer::with_flatness(0.0).is_err());
        assert!(Linearizer::with_flatness(f64::NAN).is_err());
        assert!(Linearizer::with_segments_per_quadrant(0).is_err());
        assert!(Linearizer::with_segments_per_quadrant(3).is_ok());
    }

    #[test]
    fn flatness_controls_density() {
        let coarse = Linearizer::with_flatness(10.0).unwrap();
        let fine = Linearizer::with_flatness(0.001).unwrap();
        assert_eq!(coarse.segments_per_quadrant(1.0), 1);
        assert!(fine.segments_per_quadrant(1.0) > 10);
    }

    #[test]
    fn arc_ends_exactly_and_stays_on_circle() {
        let l = Linearizer::SegmentsPerQuadrant(4);
        let c = Vect::new(1.0, 2.0).unwrap();
        let pts = l.arc(c, 3.0, 0.1, PI);
        assert_eq!(pts.len(), 2 + 8);
        assert_relative_eq!(pts[0].x(), c.project(0.1, 3.0).x());
        assert_relative_eq!(pts[pts.len() - 1].y(), c.project(0.1 + PI, 3.0).y());
        for p in &pts {
            assert_relative_eq!(p.dist(c), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn arcs_share_grid_points() {
        let l = Linearizer::SegmentsPerQuadrant(2);
        let c = Vect::ZERO;
        let a = l.arc(c, 1.0, -0.1, PI);
        let b = l.arc(c, 1.0, 0.3, PI);
        let shared = a[1..a.len() - 1].iter().filter(|p| b.contains(p)).count();
        assert_eq!(shared, 3);
    }

    #[test]
    fn circle_has_four_quadrants() {
        let l = Linearizer::default();
        assert_eq!(l.circle(Vect::ZERO, 1.0).len(), 32);
    }
}
