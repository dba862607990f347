use std::collections::HashSet;

use super::LineString;
use crate::error::Result;
use crate::math::{Line, Rect, Transform};
use crate::topology::{Network, VertexId};

/// A non-empty set of open polylines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSet {
    lines: Vec<LineString>,
}

impl LineSet {
    /// Wraps a list of line strings, or returns `None` if it is empty.
    #[must_use]
    pub fn value_of(lines: Vec<LineString>) -> Option<Self> {
        (!lines.is_empty()).then_some(Self { lines })
    }

    /// Chains the links of a network into maximal polylines.
    ///
    /// Polylines run between vertices whose degree is not two. Cycles made
    /// only of degree-two vertices come out as closed line strings starting
    /// at their smallest vertex. Returns `None` for a network without links.
    #[must_use]
    pub fn from_network(network: &Network) -> Option<Self> {
        let mut visited: HashSet<(VertexId, VertexId)> = HashSet::new();
        let mut lines = Vec::new();

        let ids: Vec<VertexId> = network.vertex_ids().collect();
        for only_cycles in [false, true] {
            for &start in &ids {
                let degree = network.neighbors(start).len();
                if degree == 0 || (degree == 2) != only_cycles {
                    continue;
                }
                for &first in network.neighbors(start) {
                    if let Some(line) = chain(network, &mut visited, start, first) {
                        lines.push(line);
                    }
                }
            }
        }
        Self::value_of(lines)
    }

    #[must_use]
    pub fn lines(&self) -> &[LineString] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; an empty line set is represented by `None`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All segments of all lines.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.iter().flat_map(LineString::edges)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.lines.iter().map(LineString::length).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.lines
            .iter()
            .map(LineString::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Rect::from_point(crate::math::Vect::ZERO))
    }

    /// Maps every line through `transform`.
    ///
    /// # Errors
    ///
    /// Fails if any line fails to transform.
    pub fn transform(&self, transform: &Transform) -> Result<Self> {
        let lines = self
            .lines
            .iter()
            .map(|l| l.transform(transform))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lines })
    }
}

fn link_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Walks from `start` through `first` until reaching a vertex whose degree
/// is not two or a link already taken.
fn chain(
    network: &Network,
    visited: &mut HashSet<(VertexId, VertexId)>,
    start: VertexId,
    first: VertexId,
) -> Option<LineString> {
    if !visited.insert(link_key(start, first)) {
        return None;
    }
    let mut points = vec![network.point(start)];
    let (mut prev, mut cur) = (start, first);
    loop {
        points.push(network.point(cur));
        let links = network.neighbors(cur);
        if links.len() != 2 {
            break;
        }
        let next = if links[0] == prev { links[1] } else { links[0] };
        if !visited.insert(link_key(cur, next)) {
            break;
        }
        (prev, cur) = (cur, next);
    }
    LineString::new(points).ok()
}
