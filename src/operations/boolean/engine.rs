use std::collections::HashSet;

use tracing::debug;

use super::classify::{LinkSides, Operand, VertexClass};
use super::select::BooleanOp;
use crate::geometry::{Area, GeoShape, Geometry, LineSet, PointSet};
use crate::index::{RTreeIndex, SpatialIndex};
use crate::math::{Line, Rect, Tolerance, Vect};
use crate::operations::relate::Relate;
use crate::topology::{extract_boundaries, Network};

/// A planar network built from the boundaries of several operands, with
/// every link and vertex classifiable against each operand.
pub(crate) struct Overlay<'a> {
    operands: Vec<Operand<'a>>,
    index: RTreeIndex<usize>,
    network: Network,
    tolerance: Tolerance,
}

impl<'a> Overlay<'a> {
    /// Adds every operand to one network and makes it planar.
    pub(crate) fn new(operands: Vec<Operand<'a>>, tolerance: Tolerance) -> Self {
        let mut network = Network::new();
        for operand in &operands {
            operand.add_to(&mut network);
        }
        network.explicit_intersections(tolerance);

        let eps = tolerance.epsilon();
        let index = RTreeIndex::bulk_load(
            operands
                .iter()
                .enumerate()
                .filter_map(|(i, op)| op.bounds().map(|b| (b.inflate(eps), i)))
                .collect(),
        );
        Self {
            operands,
            index,
            network,
            tolerance,
        }
    }

    pub(crate) fn network(&self) -> &Network {
        &self.network
    }

    pub(crate) fn operands(&self) -> &[Operand<'a>] {
        &self.operands
    }

    /// Classifies a link against every operand, in operand order.
    pub(crate) fn classify_link(&self, link: Line) -> Vec<LinkSides> {
        let mut sides = vec![LinkSides::default(); self.operands.len()];
        self.index
            .for_each_interacting(&Rect::from_point(link.midpoint()), |_, &i| {
                sides[i] = self.operands[i].classify_link(link, self.tolerance);
            });
        sides
    }

    /// Classifies a vertex against every operand, in operand order.
    pub(crate) fn classify_vertex(&self, p: Vect) -> Vec<VertexClass> {
        let mut classes = vec![VertexClass::OUTSIDE; self.operands.len()];
        self.index.for_each_interacting(&Rect::from_point(p), |_, &i| {
            classes[i] = self.operands[i].classify_vertex(p, self.tolerance);
        });
        classes
    }

    /// Builds the geometry of all regions, lines and points whose operand
    /// membership satisfies `keep`.
    ///
    /// A link becomes area boundary when `keep` differs between its two
    /// sides. A link with both sides outside the result survives as a line
    /// if `keep` accepts the operands it belongs to in any dimension. A
    /// vertex survives as a point on the same terms, unless the result
    /// already covers it.
    pub(crate) fn evaluate<F>(&self, keep: F) -> Option<GeoShape>
    where
        F: Fn(&[bool]) -> bool,
    {
        let n = self.operands.len();
        let mut left = vec![false; n];
        let mut right = vec![false; n];
        let mut member = vec![false; n];

        let mut area_net = Network::new();
        let mut forward = HashSet::new();
        let mut line_net = Network::new();
        for link in self.network.links() {
            for (k, s) in self.classify_link(link).into_iter().enumerate() {
                left[k] = s.left;
                right[k] = s.right;
                member[k] = s.member();
            }
            let keep_left = keep(&left);
            if keep_left != keep(&right) {
                area_net.add_link_points(link.a(), link.b());
                // Boundary links run with the result on their left.
                if keep_left {
                    forward.insert((link.a(), link.b()));
                } else {
                    forward.insert((link.b(), link.a()));
                }
            } else if !keep_left && keep(&member) {
                line_net.add_link_points(link.a(), link.b());
            }
        }

        let rings = extract_boundaries(&area_net, |a, b| forward.contains(&(a, b)), self.tolerance);
        let area = Area::assemble(rings, self.tolerance);
        let lines = LineSet::from_network(&line_net);

        let mut points = Vec::new();
        for p in self.network.vertices() {
            if area_net.degree(p) > 0 || line_net.degree(p) > 0 {
                continue;
            }
            for (k, c) in self.classify_vertex(p).into_iter().enumerate() {
                member[k] = c.member();
            }
            if !keep(&member) {
                continue;
            }
            if area
                .as_ref()
                .is_some_and(|a| a.relate(p, self.tolerance) != Relate::Outside)
            {
                continue;
            }
            points.push(p);
        }

        debug!(
            operands = n,
            area_links = area_net.num_links(),
            line_links = line_net.num_links(),
            points = points.len(),
            "overlay evaluated"
        );
        GeoShape::value_of(area, lines, PointSet::value_of(points, self.tolerance))
    }
}

/// Overlays any number of geometries and keeps what `keep` selects.
///
/// `keep` receives one flag per geometry, in order, telling whether a region
/// (or line, or point) belongs to that geometry, and returns whether it
/// belongs to the result. Returns `None` for an empty result.
///
/// ```
/// use polynet::geometry::{Geometry, Ring};
/// use polynet::math::Tolerance;
/// use polynet::operations::boolean::overlay;
///
/// let a = Geometry::from(Ring::from_coords(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]).unwrap());
/// let b = Geometry::from(Ring::from_coords(&[1.0, 1.0, 3.0, 1.0, 3.0, 3.0, 1.0, 3.0]).unwrap());
/// let c = Geometry::from(Ring::from_coords(&[1.0, 0.0, 3.0, 0.0, 3.0, 2.0, 1.0, 2.0]).unwrap());
///
/// // Regions covered by at least two of the three squares.
/// let twice = overlay(
///     &[&a, &b, &c],
///     |m| m.iter().filter(|&&x| x).count() >= 2,
///     Tolerance::default(),
/// );
/// assert!((twice.unwrap().area() - 3.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn overlay<F>(geometries: &[&Geometry], keep: F, tolerance: Tolerance) -> Option<Geometry>
where
    F: Fn(&[bool]) -> bool,
{
    let operands = geometries.iter().map(|g| Operand::new(g)).collect();
    Overlay::new(operands, tolerance)
        .evaluate(keep)
        .map(GeoShape::into_simplest)
}

/// Runs a two-operand boolean operation.
pub(crate) fn boolean_execute(
    a: &Geometry,
    b: &Geometry,
    op: BooleanOp,
    tolerance: Tolerance,
) -> Option<Geometry> {
    Overlay::new(vec![Operand::new(a), Operand::new(b)], tolerance)
        .evaluate(|m| op.keep_members(m))
        .map(GeoShape::into_simplest)
}
