//! Point and region classification.
//!
//! Points are classified against rings by casting a horizontal ray towards
//! +x and counting edge crossings. An edge counts when exactly one of its
//! endpoints lies strictly above the ray, so a ray through a vertex is
//! counted once and horizontal edges never count. Any edge within tolerance
//! of the point makes it [`Relate::Touch`], whatever the parity.

use bitflags::bitflags;

use super::boolean::{Operand, Overlay};
use crate::geometry::{Geometry, Ring};
use crate::index::SpatialIndex;
use crate::math::{Line, Rect, Tolerance, Vect};

/// Position of a point relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relate {
    Inside,
    Outside,
    Touch,
}

bitflags! {
    /// Mutual relation of two geometries A and B.
    ///
    /// Several flags may be set at once: two partially overlapping squares
    /// are `TOUCH | A_OUTSIDE_B | B_OUTSIDE_A`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Relation: u8 {
        /// The boundaries of A and B share at least one point.
        const TOUCH       = 0b0000_0001;
        /// A is non-empty and no part of A lies outside B.
        const A_INSIDE_B  = 0b0000_0010;
        /// B is non-empty and no part of B lies outside A.
        const B_INSIDE_A  = 0b0000_0100;
        /// Some part of A lies outside B.
        const A_OUTSIDE_B = 0b0000_1000;
        /// Some part of B lies outside A.
        const B_OUTSIDE_A = 0b0001_0000;
    }
}

impl Relation {
    /// The same relation seen with A and B swapped.
    #[must_use]
    pub fn swapped(self) -> Self {
        let mut out = self & Relation::TOUCH;
        out.set(Relation::A_INSIDE_B, self.contains(Relation::B_INSIDE_A));
        out.set(Relation::B_INSIDE_A, self.contains(Relation::A_INSIDE_B));
        out.set(Relation::A_OUTSIDE_B, self.contains(Relation::B_OUTSIDE_A));
        out.set(Relation::B_OUTSIDE_A, self.contains(Relation::A_OUTSIDE_B));
        out
    }

    /// True if A and B share no point at all.
    #[must_use]
    pub fn is_disjoint(self) -> bool {
        self == Relation::A_OUTSIDE_B | Relation::B_OUTSIDE_A
    }
}

/// Classifies a point against the region enclosed by `ring`.
#[must_use]
pub fn relate_ring(ring: &Ring, p: Vect, tolerance: Tolerance) -> Relate {
    relate_rings(std::iter::once(ring), p, tolerance)
}

/// Classifies a point against the even-odd region of a set of rings.
#[must_use]
pub fn relate_rings<'r, I>(rings: I, p: Vect, tolerance: Tolerance) -> Relate
where
    I: IntoIterator<Item = &'r Ring>,
{
    let mut inside = false;
    for ring in rings {
        if !ring.bounds().inflate(tolerance.epsilon()).contains(p) {
            continue;
        }
        if ring_touches(ring, p, tolerance) {
            return Relate::Touch;
        }
        if ring_crossings(ring, p) % 2 == 1 {
            inside = !inside;
        }
    }
    if inside {
        Relate::Inside
    } else {
        Relate::Outside
    }
}

/// True if some edge of `ring` lies within tolerance of `p`.
pub(crate) fn ring_touches(ring: &Ring, p: Vect, tolerance: Tolerance) -> bool {
    let mut touches = false;
    let query = Rect::from_point(p).inflate(tolerance.epsilon());
    ring.edge_index().for_each_interacting(&query, |_, &i| {
        if !touches {
            touches = ring_edge(ring, i).touches(p, tolerance);
        }
    });
    touches
}

/// Number of ring edges crossing the horizontal ray from `p` towards +x.
fn ring_crossings(ring: &Ring, p: Vect) -> usize {
    let bounds = ring.bounds();
    if p.x() > bounds.max_x {
        return 0;
    }
    let ray = Rect {
        min_x: p.x(),
        min_y: p.y(),
        max_x: bounds.max_x,
        max_y: p.y(),
    };
    let mut count = 0;
    ring.edge_index().for_each_interacting(&ray, |_, &i| {
        let edge = ring_edge(ring, i);
        let (a, b) = (edge.a(), edge.b());
        if (a.y() > p.y()) != (b.y() > p.y()) {
            let t = (p.y() - a.y()) / (b.y() - a.y());
            if a.x() + t * (b.x() - a.x()) > p.x() {
                count += 1;
            }
        }
    });
    count
}

/// Crossings of the ray from `origin` along `dir` with the edges of `rings`.
///
/// Edges within tolerance of `origin` are not crossed but counted apart, so
/// a caller can tell which side of a coincident boundary lies inside.
/// Returns `(crossings, coincident)`.
pub(crate) fn ray_crossings<'r, I>(
    rings: I,
    origin: Vect,
    dir: Vect,
    tolerance: Tolerance,
) -> (usize, usize)
where
    I: IntoIterator<Item = &'r Ring>,
{
    let mut crossings = 0;
    let mut coincident = 0;
    for ring in rings {
        let bounds = ring.bounds();
        let reach = (bounds.width() + bounds.height()) + origin.dist(bounds.center());
        let far = origin + dir * reach;
        let query = Rect::from_corners(origin, far).inflate(tolerance.epsilon());
        ring.edge_index().for_each_interacting(&query, |_, &i| {
            let edge = ring_edge(ring, i);
            if edge.touches(origin, tolerance) {
                coincident += 1;
                return;
            }
            let sa = dir.cross(edge.a() - origin);
            let sb = dir.cross(edge.b() - origin);
            if (sa > 0.0) != (sb > 0.0) {
                let da = dir.dot(edge.a() - origin);
                let db = dir.dot(edge.b() - origin);
                let t = (da * sb - db * sa) / (sb - sa);
                if t > 0.0 {
                    crossings += 1;
                }
            }
        });
    }
    (crossings, coincident)
}

fn ring_edge(ring: &Ring, i: usize) -> Line {
    let vertices = ring.vertices();
    Line::from_points(vertices[i], vertices[(i + 1) % vertices.len()])
}

/// Classifies a point against any geometry.
///
/// Points and lines have no interior, so they only ever return
/// [`Relate::Touch`] or [`Relate::Outside`].
#[must_use]
pub fn relate_point(geometry: &Geometry, p: Vect, tolerance: Tolerance) -> Relate {
    let operand = Operand::new(geometry);
    match operand.relate_area(p, tolerance) {
        Relate::Outside if operand.on_line(p, tolerance) || operand.has_point(p, tolerance) => {
            Relate::Touch
        }
        other => other,
    }
}

/// Computes the mutual relation of two geometries.
#[must_use]
pub fn relation(a: &Geometry, b: &Geometry, tolerance: Tolerance) -> Relation {
    let overlay = Overlay::new(vec![Operand::new(a), Operand::new(b)], tolerance);
    let mut rel = Relation::empty();

    for link in overlay.network().links() {
        let sides = overlay.classify_link(link);
        let (sa, sb) = (sides[0], sides[1]);
        let in_a = sa.boundary || sa.on_line;
        let in_b = sb.boundary || sb.on_line;
        if in_a && !sb.member() {
            rel |= Relation::A_OUTSIDE_B;
        }
        if in_b && !sa.member() {
            rel |= Relation::B_OUTSIDE_A;
        }
        if sb.boundary && sa.left && sa.right {
            rel |= Relation::A_OUTSIDE_B;
        }
        if sa.boundary && sb.left && sb.right {
            rel |= Relation::B_OUTSIDE_A;
        }
        if in_a && in_b {
            rel |= Relation::TOUCH;
        }
    }

    for p in overlay.network().vertices() {
        let classes = overlay.classify_vertex(p);
        let (ca, cb) = (classes[0], classes[1]);
        if ca.on_edge() && cb.on_edge() {
            rel |= Relation::TOUCH;
        }
        if ca.is_point && !cb.member() {
            rel |= Relation::A_OUTSIDE_B;
        }
        if cb.is_point && !ca.member() {
            rel |= Relation::B_OUTSIDE_A;
        }
    }

    let operands = overlay.operands();
    if !operands[0].is_empty() && !rel.contains(Relation::A_OUTSIDE_B) {
        rel |= Relation::A_INSIDE_B;
    }
    if !operands[1].is_empty() && !rel.contains(Relation::B_OUTSIDE_A) {
        rel |= Relation::B_INSIDE_A;
    }
    rel
}
