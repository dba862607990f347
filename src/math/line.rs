use std::cmp::Ordering;

use super::{Rect, Tolerance, Vect};
use crate::error::Result;

/// Directed line segment from `a` to `b`.
///
/// The constructor only rejects non-finite coordinates; zero-length segments
/// are representable and are detected by [`Line::is_valid`]. Lines are
/// totally ordered by `a`, then `b`, which makes them usable as set keys for
/// deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Line {
    a: Vect,
    b: Vect,
}

impl Line {
    /// Creates a segment from raw coordinates.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if any coordinate is NaN or infinite.
    pub fn new(ax: f64, ay: f64, bx: f64, by: f64) -> Result<Self> {
        Ok(Self {
            a: Vect::new(ax, ay)?,
            b: Vect::new(bx, by)?,
        })
    }

    /// Creates a segment between two points.
    #[must_use]
    pub fn from_points(a: Vect, b: Vect) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn a(&self) -> Vect {
        self.a
    }

    #[must_use]
    pub fn b(&self) -> Vect {
        self.b
    }

    /// Direction vector `b - a` (not normalised).
    #[must_use]
    pub fn delta(&self) -> Vect {
        self.b - self.a
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.a.dist(self.b)
    }

    #[must_use]
    pub fn midpoint(&self) -> Vect {
        self.a.midpoint(self.b)
    }

    /// Same segment traversed from `b` to `a`.
    #[must_use]
    pub fn reversed(&self) -> Line {
        Line {
            a: self.b,
            b: self.a,
        }
    }

    /// Returns false if the segment collapses to a point under `tolerance`.
    #[must_use]
    pub fn is_valid(&self, tolerance: Tolerance) -> bool {
        !self.a.matches(self.b, tolerance)
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.a, self.b)
    }

    /// Point at parameter `t`, where 0 is `a` and 1 is `b`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Vect {
        self.a.lerp(self.b, t)
    }

    /// Parameter of the orthogonal projection of `p` onto the extended line.
    ///
    /// Returns 0 for a zero-length segment.
    #[must_use]
    pub fn project_param(&self, p: Vect) -> f64 {
        let d = self.delta();
        let len_sq = d.length_sq();
        if len_sq == 0.0 {
            return 0.0;
        }
        (p - self.a).dot(d) / len_sq
    }

    /// Orthogonal projection of `p` onto the extended line.
    #[must_use]
    pub fn project(&self, p: Vect) -> Vect {
        self.point_at(self.project_param(p))
    }

    /// Closest point to `p` on the bounded segment.
    #[must_use]
    pub fn closest_point(&self, p: Vect) -> Vect {
        self.point_at(self.project_param(p).clamp(0.0, 1.0))
    }

    /// Distance from `p` to the extended line.
    #[must_use]
    pub fn dist_line(&self, p: Vect) -> f64 {
        let d = self.delta();
        let len = d.length();
        if len == 0.0 {
            return p.dist(self.a);
        }
        (d.cross(p - self.a) / len).abs()
    }

    /// Distance from `p` to the bounded segment.
    #[must_use]
    pub fn dist_segment(&self, p: Vect) -> f64 {
        p.dist(self.closest_point(p))
    }

    /// Returns true if `p` lies within tolerance of the bounded segment.
    #[must_use]
    pub fn touches(&self, p: Vect, tolerance: Tolerance) -> bool {
        tolerance.check(self.dist_segment(p)) == 0
    }

    /// Side of the extended line on which `p` lies: 1 for left, -1 for right,
    /// 0 when within tolerance of the line.
    #[must_use]
    pub fn side(&self, p: Vect, tolerance: Tolerance) -> i32 {
        let d = self.delta();
        let len = d.length();
        if len == 0.0 {
            return 0;
        }
        tolerance.check(d.cross(p - self.a) / len)
    }

    /// Intersection of the two extended lines, or `None` if they are parallel.
    #[must_use]
    pub fn intersection_line(&self, other: &Line) -> Option<Vect> {
        let (t, _) = self.intersection_params(other)?;
        Some(self.point_at(t))
    }

    /// Single-point intersection of the two bounded segments.
    ///
    /// The crossing may lie up to `tolerance` beyond either segment's ends,
    /// in which case the point is clamped onto this segment. Parallel and
    /// collinear segments yield `None`, as do segments lying wholly on one
    /// side of each other.
    #[must_use]
    pub fn intersection_segment(&self, other: &Line, tolerance: Tolerance) -> Option<Vect> {
        if one_sided(self, other, tolerance) || one_sided(other, self, tolerance) {
            return None;
        }
        let (t, u) = self.intersection_params(other)?;
        let eps = tolerance.epsilon();
        let slack_t = eps / self.length();
        let slack_u = eps / other.length();
        if t < -slack_t || t > 1.0 + slack_t || u < -slack_u || u > 1.0 + slack_u {
            return None;
        }
        let p = self.point_at(t.clamp(0.0, 1.0));
        // Near-parallel pairs give ill-conditioned parameters.
        if other.dist_segment(p) > 2.0 * eps {
            return None;
        }
        Some(p)
    }

    /// Parametric intersection `(t, u)` of the extended lines.
    fn intersection_params(&self, other: &Line) -> Option<(f64, f64)> {
        let d1 = self.delta();
        let d2 = other.delta();
        let cross = d1.cross(d2);
        if cross.abs() <= f64::EPSILON * d1.length() * d2.length() {
            return None;
        }
        let w = other.a - self.a;
        let t = w.cross(d2) / cross;
        let u = w.cross(d1) / cross;
        Some((t, u))
    }

    /// Total order consistent with `Ord`.
    #[must_use]
    pub fn compare(&self, other: &Line) -> Ordering {
        self.cmp(other)
    }
}

/// True if both ends of `other` lie strictly on the same side of `line`.
fn one_sided(line: &Line, other: &Line, tolerance: Tolerance) -> bool {
    let a = line.side(other.a, tolerance);
    a != 0 && a == line.side(other.b, tolerance)
}
