//! Angular ordering of directions around a vertex.
//!
//! Directions are ordered clockwise starting from compass north (+y). The
//! comparison never calls trigonometric functions: directions are first
//! bucketed into quadrants, then ordered within a quadrant by the sign of
//! their cross product.

use std::cmp::Ordering;

use super::Vect;

/// Quadrant of a direction, numbered clockwise from north.
///
/// Each quadrant includes its starting compass direction: 0 = [N, E),
/// 1 = [E, S), 2 = [S, W), 3 = [W, N).
#[must_use]
pub fn quadrant(dx: f64, dy: f64) -> u8 {
    if dx >= 0.0 && dy > 0.0 {
        0
    } else if dx > 0.0 && dy <= 0.0 {
        1
    } else if dx <= 0.0 && dy < 0.0 {
        2
    } else {
        3
    }
}

/// Orders two directions clockwise from north.
///
/// Collinear directions pointing the same way compare equal.
#[must_use]
pub fn compare_directions(a: Vect, b: Vect) -> Ordering {
    let qa = quadrant(a.x(), a.y());
    let qb = quadrant(b.x(), b.y());
    qa.cmp(&qb).then_with(|| {
        // Within a quadrant, b is later when it lies clockwise of a.
        let cross = a.cross(b);
        if cross < 0.0 {
            Ordering::Less
        } else if cross > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Orders the points `a` and `b` by their direction as seen from `origin`.
#[must_use]
pub fn compare_around(origin: Vect, a: Vect, b: Vect) -> Ordering {
    compare_directions(a - origin, b - origin)
}

/// Normalises an angle to `[0, 2pi)`.
#[must_use]
pub fn normalize_angle(a: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut r = a % two_pi;
    if r < 0.0 {
        r += two_pi;
    }
    r
}
