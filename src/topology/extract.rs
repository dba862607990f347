//! Ring extraction from a planar network.
//!
//! Every link is walked once in each direction. At each vertex the walk
//! continues along the neighbour that follows the incoming one in clockwise
//! order, so bounded faces come out counter-clockwise and the unbounded
//! face of each connected component comes out clockwise. Walks that pass
//! through a vertex more than once are cut into simple loops there.
//!
//! [`extract_boundaries`] walks directed links instead, taking at each
//! vertex the first outgoing link clockwise from the incoming one. Outer
//! boundaries come out counter-clockwise and holes clockwise.

use std::collections::HashMap;

use slotmap::SecondaryMap;
use tracing::{debug, warn};

use super::network::Network;
use super::vertex::VertexId;
use crate::geometry::{Area, Ring};
use crate::math::polygon_2d::rotate_to_canonical_start;
use crate::math::{Tolerance, Vect};

/// Extracts the counter-clockwise rings bounding the faces of `network`.
///
/// The network is expected to be planar (see
/// [`Network::explicit_intersections`]). Dangling links and the outer
/// boundaries of connected components produce no rings. Each ring starts at
/// its smallest vertex so the output is deterministic.
///
/// # Panics
///
/// Panics if a face walk fails to close, which can only happen if the
/// network's adjacency lists are inconsistent.
#[must_use]
pub fn extract_rings(network: &Network, tolerance: Tolerance) -> Vec<Ring> {
    let mut visited: SecondaryMap<VertexId, Vec<bool>> = SecondaryMap::new();
    for id in network.vertex_ids() {
        visited.insert(id, vec![false; network.neighbors(id).len()]);
    }
    let budget = 2 * network.num_links();

    let mut rings = Vec::new();
    for start in network.vertex_ids() {
        for k in 0..network.neighbors(start).len() {
            if visited[start][k] {
                continue;
            }
            let walk = walk_face(network, &mut visited, start, k, budget);
            for simple in split_loops(&walk) {
                let points: Vec<Vect> = simple.iter().map(|&id| network.point(id)).collect();
                if let Some(ring) = Ring::value_of(rotate_to_canonical_start(&points), tolerance) {
                    if tolerance.check(ring.signed_area()) > 0 {
                        rings.push(ring);
                    }
                }
            }
        }
    }
    debug!(rings = rings.len(), links = network.num_links(), "rings extracted");
    rings
}

/// Traces the closed boundaries formed by directed links of `network`.
///
/// `forward(a, b)` tells whether the link between `a` and `b` runs from `a`
/// to `b`, with the bounded region on its left. Rings keep their walk
/// orientation, so shells are counter-clockwise and holes clockwise. A walk
/// that reaches a vertex with no outgoing link is dropped.
#[must_use]
pub fn extract_boundaries<F>(network: &Network, forward: F, tolerance: Tolerance) -> Vec<Ring>
where
    F: Fn(Vect, Vect) -> bool,
{
    let forward = |a: VertexId, b: VertexId| forward(network.point(a), network.point(b));
    let mut visited: SecondaryMap<VertexId, Vec<bool>> = SecondaryMap::new();
    for id in network.vertex_ids() {
        visited.insert(id, vec![false; network.neighbors(id).len()]);
    }

    let mut rings = Vec::new();
    let mut open = 0usize;
    for start in network.vertex_ids() {
        for k in 0..network.neighbors(start).len() {
            if visited[start][k] || !forward(start, network.neighbors(start)[k]) {
                continue;
            }
            let Some(walk) = walk_boundary(network, &mut visited, start, k, &forward) else {
                open += 1;
                continue;
            };
            for simple in split_loops(&walk) {
                let points: Vec<Vect> = simple.iter().map(|&id| network.point(id)).collect();
                if let Some(ring) = Ring::value_of(rotate_to_canonical_start(&points), tolerance) {
                    if tolerance.check(ring.signed_area()) != 0 {
                        rings.push(ring);
                    }
                }
            }
        }
    }
    if open > 0 {
        warn!(open, "dropped boundary walks that did not close");
    }
    debug!(rings = rings.len(), links = network.num_links(), "boundaries extracted");
    rings
}

/// Follows forward links from the `k`-th neighbour of `start` until the
/// first link comes round again. Returns `None` if the walk strands at a
/// vertex or runs into a link it already consumed.
fn walk_boundary<F>(
    network: &Network,
    visited: &mut SecondaryMap<VertexId, Vec<bool>>,
    start: VertexId,
    k: usize,
    forward: &F,
) -> Option<Vec<VertexId>>
where
    F: Fn(VertexId, VertexId) -> bool,
{
    let first = (start, network.neighbors(start)[k]);
    let mut walk = Vec::new();
    let (mut from, mut to) = first;
    loop {
        let slot = position(network, from, to);
        if visited[from][slot] {
            return None;
        }
        visited[from][slot] = true;
        walk.push(from);

        let next = next_outgoing(network, to, from, forward)?;
        (from, to) = (to, next);
        if (from, to) == first {
            return Some(walk);
        }
    }
}

/// The first forward link leaving `at` clockwise after the link to `from`.
fn next_outgoing<F>(
    network: &Network,
    at: VertexId,
    from: VertexId,
    forward: &F,
) -> Option<VertexId>
where
    F: Fn(VertexId, VertexId) -> bool,
{
    let mut candidate = from;
    for _ in 0..network.neighbors(at).len() {
        candidate = network.next_cw(at, candidate)?;
        if forward(at, candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Follows directed links from `start` along its `k`-th neighbour until the
/// first directed link comes round again. Returns the visited vertices.
fn walk_face(
    network: &Network,
    visited: &mut SecondaryMap<VertexId, Vec<bool>>,
    start: VertexId,
    k: usize,
    budget: usize,
) -> Vec<VertexId> {
    let first = (start, network.neighbors(start)[k]);
    let mut walk = Vec::new();
    let (mut from, mut to) = first;
    loop {
        let slot = position(network, from, to);
        assert!(
            !visited[from][slot] && walk.len() < budget,
            "face walk re-entered a consumed link"
        );
        visited[from][slot] = true;
        walk.push(from);

        let Some(next) = network.next_cw(to, from) else {
            panic!("face walk reached a vertex without its incoming link");
        };
        (from, to) = (to, next);
        if (from, to) == first {
            return walk;
        }
    }
}

fn position(network: &Network, at: VertexId, neighbor: VertexId) -> usize {
    match network.neighbors(at).iter().position(|&n| n == neighbor) {
        Some(i) => i,
        None => panic!("adjacency is not symmetric"),
    }
}

/// Cuts a closed walk into simple loops at repeated vertices.
///
/// Loops shorter than three vertices are spurs along dangling links and are
/// dropped.
fn split_loops(walk: &[VertexId]) -> Vec<Vec<VertexId>> {
    let mut loops = Vec::new();
    let mut stack: Vec<VertexId> = Vec::with_capacity(walk.len());
    let mut seen: HashMap<VertexId, usize> = HashMap::new();
    for &id in walk {
        if let Some(&at) = seen.get(&id) {
            let tail = stack.split_off(at + 1);
            for v in &tail {
                seen.remove(v);
            }
            let mut simple = Vec::with_capacity(tail.len() + 1);
            simple.push(id);
            simple.extend(tail);
            if simple.len() >= 3 {
                loops.push(simple);
            }
        } else {
            seen.insert(id, stack.len());
            stack.push(id);
        }
    }
    if stack.len() >= 3 {
        loops.push(stack);
    }
    loops
}

impl Network {
    /// Rings bounding the faces of this network. See [`extract_rings`].
    #[must_use]
    pub fn rings(&self, tolerance: Tolerance) -> Vec<Ring> {
        extract_rings(self, tolerance)
    }

    /// Assembles the faces of this network into an area forest.
    ///
    /// Faces nested at odd depth become holes. Returns `None` if the network
    /// bounds no faces.
    #[must_use]
    pub fn area(&self, tolerance: Tolerance) -> Option<Area> {
        Area::assemble(self.rings(tolerance), tolerance)
    }
}
