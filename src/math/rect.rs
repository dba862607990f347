use super::Vect;

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Smallest rectangle containing both points.
    #[must_use]
    pub fn from_corners(a: Vect, b: Vect) -> Self {
        Self {
            min_x: a.x().min(b.x()),
            min_y: a.y().min(b.y()),
            max_x: a.x().max(b.x()),
            max_y: a.y().max(b.y()),
        }
    }

    /// Degenerate rectangle covering a single point.
    #[must_use]
    pub fn from_point(p: Vect) -> Self {
        Self::from_corners(p, p)
    }

    /// Bounds of a point sequence, or `None` if it is empty.
    pub fn from_points<I: IntoIterator<Item = Vect>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |r, p| r.including(p)))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Vect {
        Vect::raw((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Smallest rectangle containing this one and `p`.
    #[must_use]
    pub fn including(&self, p: Vect) -> Self {
        Self {
            min_x: self.min_x.min(p.x()),
            min_y: self.min_y.min(p.y()),
            max_x: self.max_x.max(p.x()),
            max_y: self.max_y.max(p.y()),
        }
    }

    /// Smallest rectangle containing both rectangles.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the rectangle by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// True if the interiors of the two rectangles overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// True if the rectangles overlap or touch.
    #[must_use]
    pub fn interacts(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// True if `other` lies entirely within this rectangle (boundary included).
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// True if `p` lies within the rectangle (boundary included).
    #[must_use]
    pub fn contains(&self, p: Vect) -> bool {
        self.min_x <= p.x() && p.x() <= self.max_x && self.min_y <= p.y() && p.y() <= self.max_y
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
    fn overlap_versus_interaction() {
        let a = Rect::from_corners(v(0.0, 0.0), v(1.0, 1.0));
        let touching = Rect::from_corners(v(1.0, 0.0), v(2.0, 1.0));
        let overlapping = Rect::from_corners(v(0.5, 0.5), v(2.0, 2.0));
        assert!(!a.overlaps(&touching));
        assert!(a.interacts(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn bounds_of_points() {
        let r = Rect::from_points([v(1.0, 5.0), v(-2.0, 3.0), v(4.0, -1.0)]).unwrap();
        assert_eq!(r, Rect::from_corners(v(-2.0, -1.0), v(4.0, 5.0)));
        assert!(Rect::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn containment() {
        let r = Rect::from_corners(v(0.0, 0.0), v(10.0, 10.0));
        assert!(r.contains(v(10.0, 5.0)));
        assert!(!r.contains(v(10.1, 5.0)));
        assert!(r.contains_rect(&r.inflate(-1.0)));
        assert!(!r.contains_rect(&r.inflate(1.0)));
    }
}
