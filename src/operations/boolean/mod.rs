mod classify;
mod difference;
mod engine;
mod intersection;
mod select;
mod union;
mod xor;

pub(crate) use classify::{LinkSides, Operand, VertexClass};
pub use difference::Difference;
pub(crate) use engine::Overlay;
pub use engine::overlay;
pub use intersection::Intersection;
pub use select::BooleanOp;
pub use union::{union_all, Union};
pub use xor::Xor;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::geometry::{Area, Geometry, LineString, Ring};
    use crate::math::{Tolerance, Vect};
    use crate::operations::relate::Relate;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::from(
            Ring::from_coords(&[x, y, x + size, y, x + size, y + size, x, y + size, x, y]).unwrap(),
        )
    }

    fn area_of(g: Option<Geometry>) -> f64 {
        g.map_or(0.0, |g| g.area())
    }

    fn diamond(cx: f64, cy: f64, r: f64) -> Geometry {
        Geometry::from(
            Ring::from_coords(&[cx, cy - r, cx + r, cy, cx, cy + r, cx - r, cy]).unwrap(),
        )
    }

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    /// A star-shaped polygon with one vertex per radius, evenly spaced in
    /// angle.
    fn star(cx: f64, cy: f64, rotation: f64, radii: &[f64]) -> Geometry {
        let step = std::f64::consts::TAU / radii.len() as f64;
        let points = radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let angle = rotation + step * i as f64;
                v(cx + r * angle.cos(), cy + r * angle.sin())
            })
            .collect();
        Geometry::from(Ring::new(points).unwrap())
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);
        assert_relative_eq!(area_of(Union::new(&a, &b).execute(tol())), 150.0);
        assert_relative_eq!(area_of(Intersection::new(&a, &b).execute(tol())), 50.0);
        assert_relative_eq!(area_of(Xor::new(&a, &b).execute(tol())), 100.0);

        let diff = Difference::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(diff.area(), 50.0);
        let bounds = diff.bounds();
        assert_relative_eq!(bounds.min_x, 0.0);
        assert_relative_eq!(bounds.max_x, 5.0);
    }

    #[test]
    fn xor_drops_the_enclosed_overlap() {
        // The diamond's tips stick out of the square's sides and the
        // square's corners stick out of the diamond, so the overlap is an
        // octagon surrounded by the eight pieces of the xor.
        let a = square(0.0, 0.0, 10.0);
        let b = diamond(5.0, 5.0, 8.0);
        assert_relative_eq!(area_of(Union::new(&a, &b).execute(tol())), 136.0, epsilon = 1e-9);
        assert_relative_eq!(
            area_of(Intersection::new(&a, &b).execute(tol())),
            92.0,
            epsilon = 1e-9
        );
        let xor = Xor::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(xor.area(), 44.0, epsilon = 1e-9);
        assert_eq!(xor.relate(v(5.0, 5.0), tol()), Relate::Outside);
        assert_eq!(xor.relate(v(0.5, 0.5), tol()), Relate::Inside);
        assert_eq!(xor.relate(v(5.0, -2.0), tol()), Relate::Inside);
    }

    #[test]
    fn square_less_inscribed_diamond() {
        let a = square(0.0, 0.0, 10.0);
        let b = diamond(5.0, 5.0, 5.0);
        let corners = Difference::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(corners.area(), 50.0, epsilon = 1e-9);
        assert_eq!(corners.relate(v(5.0, 5.0), tol()), Relate::Outside);
        assert_eq!(corners.relate(v(1.0, 1.0), tol()), Relate::Inside);

        let Geometry::Ring(square_ring) = &a else {
            panic!("expected a ring");
        };
        let Geometry::Ring(diamond_ring) = &b else {
            panic!("expected a ring");
        };
        let rings = vec![square_ring.clone(), diamond_ring.clone()];
        let even_odd = Area::value_of(rings, tol()).unwrap();
        assert_relative_eq!(even_odd.area(), 50.0, epsilon = 1e-9);
        assert_eq!(even_odd.relate(v(5.0, 5.0), tol()), Relate::Outside);
        assert!(even_odd.is_valid(tol()));
    }

    #[test]
    fn self_overlay() {
        let a = square(0.0, 0.0, 10.0);
        assert!(Xor::new(&a, &a).execute(tol()).is_none());
        assert!(Difference::new(&a, &a).execute(tol()).is_none());
        let same = Intersection::new(&a, &a).execute(tol()).unwrap();
        assert_relative_eq!(same.area(), 100.0);
        let same = Union::new(&a, &a).execute(tol()).unwrap();
        assert_relative_eq!(same.area(), 100.0);
    }

    #[test]
    fn union_is_commutative_and_associative() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let c = square(-3.0, 8.0, 6.0);
        let ab = Union::new(&a, &b).execute(tol()).unwrap();
        let ba = Union::new(&b, &a).execute(tol()).unwrap();
        assert_eq!(ab, ba);

        let bc = Union::new(&b, &c).execute(tol()).unwrap();
        let left = Union::new(&ab, &c).execute(tol()).unwrap();
        let right = Union::new(&a, &bc).execute(tol()).unwrap();
        assert_relative_eq!(left.area(), right.area(), epsilon = 1e-9);
        assert!(Xor::new(&left, &right).execute(tol()).is_none_or(|g| g.area() < 1e-9));
    }

    #[test]
    fn union_all_merges_chain() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);
        let c = square(10.0, 0.0, 10.0);
        let merged = union_all(&[&a, &b, &c], tol()).unwrap();
        assert_relative_eq!(merged.area(), 200.0, epsilon = 1e-9);
        let Geometry::Area(area) = &merged else {
            panic!("expected an area");
        };
        assert!(area.shell().is_some());
        assert!(union_all(&[], tol()).is_none());
    }

    #[test]
    fn disjoint_difference_is_unchanged() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        assert!(Intersection::new(&a, &b).execute(tol()).is_none());
        let diff = Difference::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(diff.area(), 1.0);
    }

    #[test]
    fn hole_is_punched() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(3.0, 3.0, 2.0);
        let diff = Difference::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(diff.area(), 96.0);
        assert_eq!(diff.relate(Vect::new(4.0, 4.0).unwrap(), tol()), Relate::Outside);
        let Geometry::Area(area) = diff else {
            panic!("expected an area");
        };
        assert_eq!(area.children().len(), 1);
        assert!(area.is_valid(tol()));
    }

    #[test]
    fn island_inside_hole() {
        let holed = Geometry::from(Area::new(
            Ring::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]).unwrap(),
            vec![Ring::from_coords(&[2.0, 2.0, 8.0, 2.0, 8.0, 8.0, 2.0, 8.0]).unwrap()],
        ));
        let island = square(4.0, 4.0, 2.0);
        let g = Union::new(&holed, &island).execute(tol()).unwrap();
        assert_relative_eq!(g.area(), 68.0);
        assert_eq!(g.relate(Vect::new(5.0, 5.0).unwrap(), tol()), Relate::Inside);
        assert_eq!(g.relate(Vect::new(3.0, 3.0).unwrap(), tol()), Relate::Outside);
    }

    #[test]
    fn squares_sharing_an_edge() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        let union = Union::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(union.area(), 200.0);
        let Geometry::Area(area) = &union else {
            panic!("expected an area");
        };
        assert!(area.shell().is_some());
        // Closed squares meet along their shared edge.
        let common = Intersection::new(&a, &b).execute(tol()).unwrap();
        assert_relative_eq!(common.length(), 10.0);
        assert_relative_eq!(common.area(), 0.0);
    }

    #[test]
    fn squares_touching_at_a_corner() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 1.0, 1.0);
        let common = Intersection::new(&a, &b).execute(tol()).unwrap();
        assert_eq!(common, Geometry::Point(Vect::new(1.0, 1.0).unwrap()));
    }

    #[test]
    fn line_clipped_by_area() {
        let line = Geometry::from(LineString::from_coords(&[-5.0, 5.0, 15.0, 5.0]).unwrap());
        let a = square(0.0, 0.0, 10.0);
        let inside = Intersection::new(&line, &a).execute(tol()).unwrap();
        assert_relative_eq!(inside.length(), 10.0);
        let outside = Difference::new(&line, &a).execute(tol()).unwrap();
        assert_relative_eq!(outside.length(), 10.0);
        let merged = Union::new(&a, &line).execute(tol()).unwrap();
        assert_relative_eq!(merged.area(), 100.0);
        assert_relative_eq!(merged.length(), 40.0 + 10.0);
    }

    fn star_params() -> impl Strategy<Value = (f64, f64, f64, Vec<f64>)> {
        (
            -4.0f64..4.0,
            -4.0f64..4.0,
            0.0f64..std::f64::consts::TAU,
            prop::collection::vec(2.0f64..10.0, 3..9),
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn boolean_area_identities(
            (ax, ay, ar, a_radii) in star_params(),
            (bx, by, br, b_radii) in star_params(),
        ) {
            let a = star(ax, ay, ar, &a_radii);
            let b = star(bx, by, br, &b_radii);
            let union = area_of(Union::new(&a, &b).execute(tol()));
            let common = area_of(Intersection::new(&a, &b).execute(tol()));
            let less = area_of(Difference::new(&a, &b).execute(tol()));
            let xor = area_of(Xor::new(&a, &b).execute(tol()));
            let eps = 1e-6 * (a.area() + b.area());
            prop_assert!((union - (a.area() + b.area() - common)).abs() <= eps);
            prop_assert!((less - (a.area() - common)).abs() <= eps);
            prop_assert!((xor - (union - common)).abs() <= eps);
        }
    }
}
