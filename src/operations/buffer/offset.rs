use std::borrow::Cow;
use std::f64::consts::PI;

use tracing::debug;

use super::Linearizer;
use crate::error::{OperationError, Result};
use crate::geometry::{Geometry, Ring};
use crate::math::{Line, Tolerance, Vect};
use crate::operations::boolean::{Operand, Overlay};

/// Grows or shrinks a geometry by a distance.
///
/// A positive amount adds every point within `amount` of the geometry. A
/// negative amount removes from the enclosed region every point within
/// `-amount` of its boundary; points and lines enclose nothing, so they
/// erode to `None`.
///
/// Each edge is swept into a capsule: its two offset copies joined by
/// half-circle arcs around the end points. The capsules are then merged
/// with the geometry in a single overlay.
#[derive(Debug)]
pub struct Buffer<'a> {
    geometry: &'a Geometry,
    amount: f64,
    linearizer: Linearizer,
}

impl<'a> Buffer<'a> {
    /// Creates a new buffer operation with the default linearizer.
    #[must_use]
    pub fn new(geometry: &'a Geometry, amount: f64) -> Self {
        Self {
            geometry,
            amount,
            linearizer: Linearizer::default(),
        }
    }

    #[must_use]
    pub fn with_linearizer(mut self, linearizer: Linearizer) -> Self {
        self.linearizer = linearizer;
        self
    }

    /// Executes the buffer.
    ///
    /// An amount within tolerance of zero returns the geometry unchanged.
    /// Returns `None` when nothing is left.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-finite amount or an
    /// invalid linearizer.
    pub fn execute(&self, tolerance: Tolerance) -> Result<Option<Geometry>> {
        if !self.amount.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "buffer amount must be finite, got {}",
                self.amount
            ))
            .into());
        }
        self.linearizer.validate()?;
        let tolerance = match self.linearizer {
            Linearizer::Flatness(f) => tolerance.least_precise(Tolerance::new(f)?),
            Linearizer::SegmentsPerQuadrant(_) => tolerance,
        };

        if tolerance.is_zero(self.amount) {
            return Ok(Some(self.geometry.clone()));
        }

        let radius = self.amount.abs();
        let growing = self.amount > 0.0;
        let base = if growing {
            Operand::new(self.geometry)
        } else {
            let rings = enclosing_rings(self.geometry);
            if rings.is_empty() {
                return Ok(None);
            }
            Operand::from_rings(rings)
        };

        let capsules = self.capsules(radius, growing);
        debug!(capsules = capsules.len(), amount = self.amount, "buffer");

        let mut operands = Vec::with_capacity(capsules.len() + 1);
        operands.push(base);
        operands.extend(capsules.into_iter().map(|r| Operand::from_rings(vec![Cow::Owned(r)])));

        let overlay = Overlay::new(operands, tolerance);
        let shape = if growing {
            overlay.evaluate(|m| m.iter().any(|&x| x))
        } else {
            overlay.evaluate(|m| m[0] && !m[1..].iter().any(|&x| x))
        };
        Ok(shape.map(crate::geometry::GeoShape::into_simplest))
    }

    /// Capsules around every edge that takes part in the buffer, plus
    /// circles around isolated points when growing.
    fn capsules(&self, radius: f64, growing: bool) -> Vec<Ring> {
        let mut edges: Vec<Line> = Vec::new();
        let mut points: Vec<Vect> = Vec::new();

        match self.geometry {
            Geometry::Point(p) => points.push(*p),
            Geometry::LineString(ls) => edges.extend(ls.edges()),
            Geometry::LineSet(set) => edges.extend(set.edges()),
            Geometry::Ring(ring) => edges.extend(ring.edges()),
            Geometry::Area(area) => edges.extend(area.rings().flat_map(Ring::edges)),
            Geometry::PointSet(set) => points.extend_from_slice(set.points()),
            Geometry::GeoShape(shape) => {
                if let Some(area) = shape.area() {
                    edges.extend(area.rings().flat_map(Ring::edges));
                }
                if growing {
                    if let Some(lines) = shape.lines() {
                        edges.extend(lines.edges());
                    }
                    if let Some(set) = shape.points() {
                        points.extend_from_slice(set.points());
                    }
                }
            }
        }

        let l = &self.linearizer;
        edges
            .into_iter()
            .filter_map(|e| capsule(e, radius, l))
            .chain(points.into_iter().filter_map(|p| circle(p, radius, l)))
            .collect()
    }
}

/// Rings bounding the enclosed region of a geometry, empty for points and
/// lines.
fn enclosing_rings(geometry: &Geometry) -> Vec<Cow<'_, Ring>> {
    match geometry {
        Geometry::Ring(ring) => vec![Cow::Borrowed(ring)],
        Geometry::Area(area) => area.rings().map(Cow::Borrowed).collect(),
        Geometry::GeoShape(shape) => shape
            .area()
            .map(|a| a.rings().map(Cow::Borrowed).collect())
            .unwrap_or_default(),
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::LineSet(_)
        | Geometry::PointSet(_) => Vec::new(),
    }
}

/// Counter-clockwise capsule around `edge`: the right offset from `a` to
/// `b`, a half circle around `b`, the left offset back and a half circle
/// around `a`.
fn capsule(edge: Line, radius: f64, linearizer: &Linearizer) -> Option<Ring> {
    let (a, b) = (edge.a(), edge.b());
    let dir = edge.delta().normalized().ok()?;
    let right = -dir.left_normal();
    let start = right.angle();

    let mut points = Vec::new();
    points.push(a + right * radius);
    points.extend(linearizer.arc(b, radius, start, PI));
    points.extend(linearizer.arc(a, radius, start + PI, PI));
    points.pop();
    Ring::new(points).ok()
}

fn circle(center: Vect, radius: f64, linearizer: &Linearizer) -> Option<Ring> {
    Ring::new(linearizer.circle(center, radius)).ok()
}
