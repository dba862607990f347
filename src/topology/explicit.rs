//! Intersection explicitization.
//!
//! Turns an arbitrary tangle of links into a planar subdivision: vertices
//! closer than the tolerance are merged, links are split wherever another
//! link's endpoint lies on them, and crossing links are split at their
//! crossing point. Splitting one pair can create new near-coincidences, so
//! the pass repeats until nothing changes.

use tracing::{debug, trace};

use super::network::Network;
use super::vertex::VertexId;
use crate::index::{RTreeIndex, SpatialIndex};
use crate::math::{Line, Rect, Tolerance, Vect};

/// Upper bound on splitting passes before the network is declared inconsistent.
const MAX_PASSES: usize = 64;

/// Finds existing vertices within tolerance of a point.
struct VertexLocator {
    index: RTreeIndex<VertexId>,
    tolerance: Tolerance,
}

impl VertexLocator {
    fn new(network: &Network, tolerance: Tolerance) -> Self {
        let items = network
            .vertex_ids()
            .map(|id| (Rect::from_point(network.point(id)), id))
            .collect();
        Self {
            index: RTreeIndex::bulk_load(items),
            tolerance,
        }
    }

    /// Returns the closest live vertex matching `p`, if any.
    fn find(&self, network: &Network, p: Vect) -> Option<VertexId> {
        let query = Rect::from_point(p).inflate(self.tolerance.epsilon());
        let mut best: Option<(f64, VertexId)> = None;
        self.index.for_each_interacting(&query, |_, &id| {
            let Some(data) = network.vertex(id) else {
                return;
            };
            if !data.point.matches(p, self.tolerance) {
                return;
            }
            let d = data.point.dist_sq(p);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, id));
            }
        });
        best.map(|(_, id)| id)
    }

    fn find_or_insert(&mut self, network: &mut Network, p: Vect) -> VertexId {
        if let Some(id) = self.find(network, p) {
            return id;
        }
        let id = network.vertex_at_or_insert(p);
        self.index.insert(Rect::from_point(p), id);
        id
    }
}

impl Network {
    /// Makes every intersection between links explicit.
    ///
    /// Afterwards no two links meet except at a shared endpoint: vertices
    /// within `tolerance` of each other have been merged, collinear overlaps
    /// have collapsed into shared links, and isolated vertices lying on a
    /// link have been spliced into it. Returns true if the network changed.
    ///
    /// # Panics
    ///
    /// Panics if splitting does not reach a fixed point, which indicates an
    /// internal inconsistency rather than bad input.
    pub fn explicit_intersections(&mut self, tolerance: Tolerance) -> bool {
        let merged = self.snap_vertices(tolerance);
        let mut total_splits = 0;

        for pass in 0..MAX_PASSES {
            let splits = self.split_pass(tolerance);
            trace!(pass, splits, links = self.num_links(), "explicitization pass");
            if splits == 0 {
                debug!(
                    passes = pass + 1,
                    merged,
                    splits = total_splits,
                    vertices = self.num_vertices(),
                    links = self.num_links(),
                    "explicit intersections complete"
                );
                return merged > 0 || total_splits > 0;
            }
            total_splits += splits;
        }
        panic!("explicit intersections did not converge after {MAX_PASSES} passes");
    }

    /// Merges every vertex into the first vertex (in coordinate order) that
    /// matches it within tolerance. Returns the number of merged vertices.
    fn snap_vertices(&mut self, tolerance: Tolerance) -> usize {
        let locator = VertexLocator::new(self, tolerance);
        let ids: Vec<VertexId> = self.vertex_ids().collect();
        let mut merged = 0;
        for id in ids {
            let Some(p) = self.vertex(id).map(|data| data.point) else {
                continue;
            };
            let query = Rect::from_point(p).inflate(tolerance.epsilon());
            let mut doomed = Vec::new();
            locator.index.for_each_interacting(&query, |_, &other| {
                if other != id
                    && self
                        .vertex(other)
                        .is_some_and(|data| data.point.matches(p, tolerance))
                {
                    doomed.push(other);
                }
            });
            for other in doomed {
                self.merge_vertex(other, id);
                merged += 1;
            }
        }
        merged
    }

    /// Runs one splitting pass. Returns the number of links that were split.
    fn split_pass(&mut self, tolerance: Tolerance) -> usize {
        let eps = tolerance.epsilon();
        let ids = self.link_ids();
        let lines: Vec<Line> = ids
            .iter()
            .map(|&(a, b)| Line::from_points(self.point(a), self.point(b)))
            .collect();
        let index = RTreeIndex::bulk_load(
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| (line.bounds().inflate(eps), i))
                .collect(),
        );

        let mut cuts: Vec<Vec<Vect>> = vec![Vec::new(); lines.len()];
        let mut candidates = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            candidates.clear();
            index.for_each_interacting(&line.bounds().inflate(eps), |_, &j| {
                if j > i {
                    candidates.push(j);
                }
            });
            for &j in &candidates {
                find_cuts(i, j, &lines, tolerance, &mut cuts);
            }
        }

        // Isolated vertices lying on a link are spliced into it.
        for p in self.isolated_points() {
            index.for_each_interacting(&Rect::from_point(p).inflate(eps), |_, &i| {
                let line = &lines[i];
                if line.touches(p, tolerance) && !is_endpoint(line, p, tolerance) {
                    cuts[i].push(p);
                }
            });
        }

        let mut locator = VertexLocator::new(self, tolerance);
        let mut split = 0;
        for (i, mut points) in cuts.into_iter().enumerate() {
            if points.is_empty() {
                continue;
            }
            let (a, b) = ids[i];
            let line = &lines[i];
            points.sort_by(|p, q| line.project_param(*p).total_cmp(&line.project_param(*q)));
            points.dedup_by(|p, q| p.matches(*q, tolerance));

            self.unlink(a, b);
            let mut prev = a;
            for p in points {
                let next = locator.find_or_insert(self, p);
                if next != prev {
                    self.link(prev, next);
                }
                prev = next;
            }
            if prev != b {
                self.link(prev, b);
            }
            split += 1;
        }
        split
    }

    fn isolated_points(&self) -> Vec<Vect> {
        self.vertex_ids()
            .filter(|&id| self.neighbors(id).is_empty())
            .map(|id| self.point(id))
            .collect()
    }
}

fn is_endpoint(line: &Line, p: Vect, tolerance: Tolerance) -> bool {
    p.matches(line.a(), tolerance) || p.matches(line.b(), tolerance)
}

/// Records where links `i` and `j` must be split.
fn find_cuts(i: usize, j: usize, lines: &[Line], tolerance: Tolerance, cuts: &mut [Vec<Vect>]) {
    let (li, lj) = (&lines[i], &lines[j]);
    let mut touched = false;
    for (target, other, idx) in [(li, lj, i), (lj, li, j)] {
        for end in [other.a(), other.b()] {
            if target.touches(end, tolerance) {
                touched = true;
                if !is_endpoint(target, end, tolerance) {
                    cuts[idx].push(end);
                }
            }
        }
    }
    if touched {
        return;
    }
    if let Some(x) = li.intersection_segment(lj, tolerance) {
        if !is_endpoint(li, x, tolerance) && !is_endpoint(lj, x, tolerance) {
            cuts[i].push(x);
            cuts[j].push(x);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    /// Asserts that links only meet at shared endpoints.
    fn assert_planar(network: &Network) {
        let loose = Tolerance::new(1e-6).unwrap();
        let links = network.links();
        for (i, l1) in links.iter().enumerate() {
            for l2 in &links[i + 1..] {
                for (target, other) in [(l1, l2), (l2, l1)] {
                    for end in [other.a(), other.b()] {
                        if target.touches(end, tol()) {
                            assert!(
                                is_endpoint(target, end, loose),
                                "{end:?} lies inside {target:?}"
                            );
                        }
                    }
                }
                if let Some(x) = l1.intersection_segment(l2, tol()) {
                    assert!(
                        is_endpoint(l1, x, loose) && is_endpoint(l2, x, loose),
                        "{l1:?} crosses {l2:?} at {x:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn crossing_links_are_split() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 10.0, 10.0).unwrap();
        network.add_link(0.0, 10.0, 10.0, 0.0).unwrap();
        assert!(network.explicit_intersections(tol()));
        assert_eq!(network.num_links(), 4);
        assert_eq!(network.num_vertices(), 5);
        assert_eq!(network.degree(v(5.0, 5.0)), 4);
    }

    #[test]
    fn no_crossings_is_a_no_op() {
        let mut network = Network::new();
        network.add_path(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)], true);
        assert!(!network.explicit_intersections(tol()));
        assert_eq!(network.num_links(), 3);
    }

    #[test]
    fn t_junction_splits_the_through_link() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 10.0, 0.0).unwrap();
        network.add_link(5.0, 0.0, 5.0, 5.0).unwrap();
        network.explicit_intersections(tol());
        assert_eq!(network.num_links(), 3);
        assert!(network.has_link(v(0.0, 0.0), v(5.0, 0.0)));
        assert!(network.has_link(v(5.0, 0.0), v(10.0, 0.0)));
    }

    #[test]
    fn collinear_overlap_collapses() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 10.0, 0.0).unwrap();
        network.add_link(5.0, 0.0, 15.0, 0.0).unwrap();
        network.explicit_intersections(tol());
        assert_eq!(network.num_links(), 3);
        assert!(network.has_link(v(5.0, 0.0), v(10.0, 0.0)));
    }

    #[test]
    fn near_vertices_are_merged() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 1.0, 0.0).unwrap();
        network.add_link(1.0 + 1e-12, 0.0, 1.0, 1.0).unwrap();
        network.explicit_intersections(tol());
        assert_eq!(network.num_vertices(), 3);
        assert_eq!(network.degree(v(1.0, 0.0)), 2);
    }

    #[test]
    fn isolated_vertex_on_link_is_spliced() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 4.0, 0.0).unwrap();
        network.add_vertex(1.0, 0.0).unwrap();
        network.explicit_intersections(tol());
        assert_eq!(network.num_links(), 2);
        assert_eq!(network.degree(v(1.0, 0.0)), 2);
    }

    #[test]
    fn concurrent_lines_share_one_vertex() {
        let mut network = Network::new();
        network.add_link(-1.0, 0.0, 1.0, 0.0).unwrap();
        network.add_link(0.0, -1.0, 0.0, 1.0).unwrap();
        network.add_link(-1.0, -1.0, 1.0, 1.0).unwrap();
        network.explicit_intersections(tol());
        assert_eq!(network.degree(v(0.0, 0.0)), 6);
        assert_planar(&network);
    }

    fn segment() -> impl Strategy<Value = (i32, i32, i32, i32)> {
        (-20..20, -20..20, -20..20, -20..20)
    }

    proptest! {
        #[test]
        fn explicitized_network_is_planar(segments in prop::collection::vec(segment(), 1..12)) {
            let mut network = Network::new();
            for (ax, ay, bx, by) in segments {
                network
                    .add_link(f64::from(ax), f64::from(ay), f64::from(bx), f64::from(by))
                    .unwrap();
            }
            network.explicit_intersections(tol());
            assert_planar(&network);
            let mut again = network.clone();
            prop_assert!(!again.explicit_intersections(tol()));
        }
    }
}
