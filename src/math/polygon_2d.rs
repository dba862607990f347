use super::{Vect, VectBuilder};

/// Computes the signed area of a closed vertex loop (shoelace formula).
///
/// The loop is implicitly closed: the last vertex connects back to the first.
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Vect]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let origin = points[0];
    let mut sum = 0.0;
    for i in 1..n - 1 {
        sum += (points[i] - origin).cross(points[i + 1] - origin);
    }
    sum * 0.5
}

/// Perimeter of a closed vertex loop.
#[must_use]
pub fn perimeter(points: &[Vect]) -> f64 {
    let n = points.len();
    (0..n).map(|i| points[i].dist(points[(i + 1) % n])).sum()
}

/// Area-weighted centroid of a closed vertex loop.
///
/// Falls back to the vertex average when the loop has no area.
#[must_use]
pub fn centroid(points: &[Vect]) -> Vect {
    let n = points.len();
    if n == 0 {
        return Vect::ZERO;
    }
    let origin = points[0];
    let mut acc = VectBuilder::default();
    let mut twice_area = 0.0;
    for i in 1..n.saturating_sub(1) {
        let a = points[i] - origin;
        let b = points[i + 1] - origin;
        let cross = a.cross(b);
        twice_area += cross;
        acc.add((a.x() + b.x()) * cross, (a.y() + b.y()) * cross);
    }
    if twice_area == 0.0 {
        let mut avg = VectBuilder::default();
        for p in points {
            avg.add(p.x(), p.y());
        }
        #[allow(clippy::cast_precision_loss)]
        avg.div(n as f64);
        return avg.build().unwrap_or(origin);
    }
    acc.div(3.0 * twice_area).add(origin.x(), origin.y());
    acc.build().unwrap_or(origin)
}

/// Rotates a closed loop so it starts at its smallest vertex in `Vect` order
/// (leftmost, then bottommost). Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Vect]) -> Vec<Vect> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let best = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(i, _)| i);
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Returns the leftmost-bottommost vertex of a loop, or `None` if empty.
#[must_use]
pub fn leftmost_bottom(points: &[Vect]) -> Option<Vect> {
    points.iter().copied().min()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    fn square() -> Vec<Vect> {
        vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area(&square()), 1.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert_relative_eq!(signed_area(&pts), -1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_relative_eq!(signed_area(&[v(0.0, 0.0)]), 0.0);
        assert_relative_eq!(signed_area(&[]), 0.0);
    }

    #[test]
    fn centroid_of_offset_square() {
        let pts: Vec<Vect> = square().into_iter().map(|p| p + v(2.0, 3.0)).collect();
        let c = centroid(&pts);
        assert_relative_eq!(c.x(), 2.5);
        assert_relative_eq!(c.y(), 3.5);
    }

    #[test]
    fn perimeter_of_square() {
        assert_relative_eq!(perimeter(&square()), 4.0);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0), v(0.0, 0.0)];
        let rotated = rotate_to_canonical_start(&pts);
        assert_eq!(rotated[0], v(0.0, 0.0));
        assert_eq!(rotated[1], v(1.0, 0.0));
    }

    #[test]
    fn leftmost_bottom_basic() {
        let pts = vec![v(1.0, 2.0), v(0.5, 1.0), v(0.5, 0.5), v(2.0, 0.0)];
        assert_eq!(leftmost_bottom(&pts).unwrap(), v(0.5, 0.5));
    }
}
