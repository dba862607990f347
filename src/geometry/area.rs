use std::borrow::Cow;

use super::Ring;
use crate::error::Result;
use crate::math::{Rect, Tolerance, Transform, Vect};
use crate::operations::boolean::{Operand, Overlay};
use crate::operations::relate::{relate_rings, Relate};
use crate::tessellation::{triangulate_area, TriangleMesh};

/// A polygon with holes, or a set of such polygons.
///
/// Each node has a shell ring and child areas. The children of a shell are
/// its holes; the children of a hole are islands inside it, and so on. The
/// shell is `None` only at the root of a multi-polygon, whose children are
/// then disjoint polygons.
///
/// Rings are oriented by nesting depth: shells (even depth) are
/// counter-clockwise and holes (odd depth) clockwise, so the interior
/// always lies to the left of every ring and the area is the sum of the
/// rings' signed areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    shell: Option<Ring>,
    children: Vec<Area>,
}

impl Area {
    /// Creates a polygon from a shell and holes, orienting the rings.
    ///
    /// The holes are trusted to lie inside the shell and not to overlap;
    /// use [`Area::value_of`] for arbitrary rings.
    #[must_use]
    pub fn new(shell: Ring, holes: Vec<Ring>) -> Self {
        Self {
            shell: Some(shell.with_orientation(true)),
            children: holes
                .into_iter()
                .map(|hole| Self {
                    shell: Some(hole.with_orientation(false)),
                    children: Vec::new(),
                })
                .collect(),
        }
    }

    /// Groups top-level polygons under one root. Returns `None` if there
    /// are none and the single polygon itself if there is one.
    #[must_use]
    pub fn multi(mut parts: Vec<Area>) -> Option<Self> {
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self {
                shell: None,
                children: parts,
            }),
        }
    }

    /// Reassembles a node whose rings are already oriented and nested.
    pub(crate) fn from_parts(shell: Option<Ring>, children: Vec<Area>) -> Self {
        Self { shell, children }
    }

    /// Arranges non-overlapping rings into a forest by containment.
    ///
    /// Each ring is placed under the smallest ring containing its interior
    /// point; rings at odd depth become holes. Returns `None` if `rings` is
    /// empty.
    #[must_use]
    pub fn assemble(rings: Vec<Ring>, tolerance: Tolerance) -> Option<Self> {
        let mut rings: Vec<Ring> = rings.into_iter().map(|r| r.with_orientation(true)).collect();
        rings.sort_by(|a, b| b.area().total_cmp(&a.area()));

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rings.len()];
        let mut roots = Vec::new();
        for i in 0..rings.len() {
            let p = rings[i].interior_point();
            let mut parent = None;
            let mut level: &[usize] = &roots;
            while let Some(&j) = level
                .iter()
                .find(|&&j| rings[j].relate(p, tolerance) == Relate::Inside)
            {
                parent = Some(j);
                level = &children[j];
            }
            match parent {
                Some(j) => children[j].push(i),
                None => roots.push(i),
            }
        }

        let mut slots: Vec<Option<Ring>> = rings.into_iter().map(Some).collect();
        let parts = roots
            .iter()
            .filter_map(|&i| build_node(i, 0, &mut slots, &children))
            .collect();
        Self::multi(parts)
    }

    /// Builds a valid area from arbitrary rings under the even-odd rule.
    ///
    /// Rings may self-intersect and overlap; a point is inside the result
    /// when it is enclosed by an odd number of rings. Returns `None` if
    /// nothing is enclosed.
    #[must_use]
    pub fn value_of(rings: Vec<Ring>, tolerance: Tolerance) -> Option<Self> {
        let operand = Operand::from_rings(rings.into_iter().map(Cow::Owned).collect());
        Overlay::new(vec![operand], tolerance)
            .evaluate(|m| m[0])
            .and_then(super::GeoShape::into_area)
    }

    /// The shell ring, `None` at a multi-polygon root.
    #[must_use]
    pub fn shell(&self) -> Option<&Ring> {
        self.shell.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[Area] {
        &self.children
    }

    /// All rings, depth first.
    pub fn rings(&self) -> Rings<'_> {
        Rings { stack: vec![self] }
    }

    /// Net enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rings().map(Ring::signed_area).sum()
    }

    /// Total length of all rings.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.rings().map(Ring::length).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.rings()
            .map(Ring::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Rect::from_point(Vect::ZERO))
    }

    #[must_use]
    pub fn relate(&self, p: Vect, tolerance: Tolerance) -> Relate {
        relate_rings(self.rings(), p, tolerance)
    }

    /// True if every ring is valid and correctly oriented, and every child
    /// lies inside its parent's shell without overlapping its siblings.
    #[must_use]
    pub fn is_valid(&self, tolerance: Tolerance) -> bool {
        match &self.shell {
            Some(_) => self.is_valid_at(0, tolerance),
            None => {
                !self.children.is_empty()
                    && siblings_disjoint(&self.children, tolerance)
                    && self.children.iter().all(|c| c.is_valid_at(0, tolerance))
            }
        }
    }

    fn is_valid_at(&self, depth: usize, tolerance: Tolerance) -> bool {
        let Some(shell) = &self.shell else {
            return false;
        };
        if !shell.is_valid(tolerance) || shell.is_ccw() != (depth % 2 == 0) {
            return false;
        }
        let inside = self.children.iter().all(|child| {
            child
                .shell
                .as_ref()
                .is_some_and(|r| shell.relate(r.interior_point(), tolerance) == Relate::Inside)
        });
        inside
            && siblings_disjoint(&self.children, tolerance)
            && self
                .children
                .iter()
                .all(|c| c.is_valid_at(depth + 1, tolerance))
    }

    /// Maps every ring through `transform`, re-orienting rings if the
    /// transform is a reflection.
    ///
    /// # Errors
    ///
    /// Fails if any ring fails to transform.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        self.transform_at(0, transform)
    }

    fn transform_at(&self, depth: usize, transform: &Transform) -> Result<Self> {
        let shell = match &self.shell {
            Some(ring) => Some(ring.transform(transform)?.with_orientation(depth % 2 == 0)),
            None => None,
        };
        let child_depth = if shell.is_some() { depth + 1 } else { depth };
        let children = self
            .children
            .iter()
            .map(|c| c.transform_at(child_depth, transform))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { shell, children })
    }

    /// Triangulates the enclosed region.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::Failed` if a ring cannot be inserted as
    /// a constraint.
    pub fn triangulate(&self) -> Result<TriangleMesh> {
        triangulate_area(self)
    }
}

fn build_node(
    i: usize,
    depth: usize,
    slots: &mut [Option<Ring>],
    children: &[Vec<usize>],
) -> Option<Area> {
    let ring = slots[i].take()?;
    let kids = children[i]
        .iter()
        .filter_map(|&c| build_node(c, depth + 1, slots, children))
        .collect();
    Some(Area {
        shell: Some(ring.with_orientation(depth % 2 == 0)),
        children: kids,
    })
}

fn siblings_disjoint(siblings: &[Area], tolerance: Tolerance) -> bool {
    siblings.iter().enumerate().all(|(i, a)| {
        siblings.iter().skip(i + 1).all(|b| match (&a.shell, &b.shell) {
            (Some(ra), Some(rb)) => {
                !ra.bounds().overlaps(&rb.bounds())
                    || (ra.relate(rb.interior_point(), tolerance) == Relate::Outside
                        && rb.relate(ra.interior_point(), tolerance) == Relate::Outside)
            }
            _ => false,
        })
    })
}

/// Depth-first iterator over the rings of an [`Area`].
#[derive(Debug, Clone)]
pub struct Rings<'a> {
    stack: Vec<&'a Area>,
}

impl<'a> Iterator for Rings<'a> {
    type Item = &'a Ring;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(area) = self.stack.pop() {
            self.stack.extend(area.children.iter().rev());
            if let Some(shell) = &area.shell {
                return Some(shell);
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn square(x: f64, y: f64, size: f64) -> Ring {
        Ring::from_coords(&[x, y, x + size, y, x + size, y + size, x, y + size]).unwrap()
    }

    #[test]
    fn new_orients_rings() {
        let area = Area::new(square(0.0, 0.0, 10.0).reversed(), vec![square(2.0, 2.0, 2.0)]);
        assert!(area.shell().unwrap().is_ccw());
        assert!(!area.children()[0].shell().unwrap().is_ccw());
        assert_relative_eq!(area.area(), 96.0);
        assert_relative_eq!(area.length(), 48.0);
        assert!(area.is_valid(tol()));
    }

    #[test]
    fn assemble_nests_by_containment() {
        let rings = vec![
            square(4.0, 4.0, 2.0),
            square(0.0, 0.0, 10.0),
            square(20.0, 0.0, 5.0),
            square(2.0, 2.0, 6.0),
        ];
        let area = Area::assemble(rings, tol()).unwrap();
        assert!(area.shell().is_none());
        assert_eq!(area.children().len(), 2);
        assert_relative_eq!(area.area(), 100.0 - 36.0 + 4.0 + 25.0);
        assert_eq!(area.relate(Vect::new(5.0, 5.0).unwrap(), tol()), Relate::Inside);
        assert_eq!(area.relate(Vect::new(3.0, 3.0).unwrap(), tol()), Relate::Outside);
        assert!(area.is_valid(tol()));
        assert_eq!(area.rings().count(), 4);
    }

    #[test]
    fn assemble_nothing() {
        assert!(Area::assemble(Vec::new(), tol()).is_none());
    }

    #[test]
    fn value_of_resolves_overlaps() {
        // Two overlapping squares: even-odd keeps the symmetric difference.
        let area = Area::value_of(vec![square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)], tol())
            .unwrap();
        assert_relative_eq!(area.area(), 100.0, epsilon = 1e-9);
        assert!(area.is_valid(tol()));
    }

    #[test]
    fn overlapping_holes_are_invalid() {
        let area = Area::new(
            square(0.0, 0.0, 10.0),
            vec![square(1.0, 1.0, 4.0), square(2.0, 2.0, 4.0)],
        );
        assert!(!area.is_valid(tol()));
    }

    #[test]
    fn reflection_keeps_orientation_convention() {
        let area = Area::new(square(0.0, 0.0, 10.0), vec![square(2.0, 2.0, 2.0)]);
        let mirrored = area.transform(&Transform::scale(-1.0, 1.0)).unwrap();
        assert!(mirrored.shell().unwrap().is_ccw());
        assert_relative_eq!(mirrored.area(), 96.0);
    }
}
