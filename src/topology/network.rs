use std::collections::BTreeMap;

use slotmap::SlotMap;

use super::vertex::{VertexData, VertexId};
use crate::error::Result;
use crate::math::angle::compare_around;
use crate::math::{Line, Rect, Vect};

/// Mutable undirected planar graph of vertices and links.
///
/// Vertices live in a slot-map arena and are keyed by their exact
/// coordinate. Each vertex keeps its neighbours sorted clockwise from
/// compass north, so stepping to the next link around a vertex is a lookup
/// in a short sorted list. Links are stored symmetrically: adding `(a, b)`
/// makes `b` a neighbour of `a` and `a` a neighbour of `b`.
///
/// A network is a transient working structure: overlay and buffer
/// operations build one, mutate it, and discard it.
#[derive(Debug, Clone, Default)]
pub struct Network {
    vertices: SlotMap<VertexId, VertexData>,
    by_point: BTreeMap<Vect, VertexId>,
    link_count: usize,
}

impl Network {
    /// Creates a new, empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from a set of segments.
    pub fn from_lines<I: IntoIterator<Item = Line>>(lines: I) -> Self {
        let mut network = Self::new();
        for line in lines {
            network.add_link_points(line.a(), line.b());
        }
        network
    }

    // --- Vertex operations ---

    /// Adds an isolated vertex. Returns false if a vertex already exists there.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite coordinate.
    pub fn add_vertex(&mut self, x: f64, y: f64) -> Result<bool> {
        let p = Vect::new(x, y)?;
        let existed = self.by_point.contains_key(&p);
        self.vertex_at_or_insert(p);
        Ok(!existed)
    }

    /// Removes a vertex and every link incident to it.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite coordinate.
    pub fn remove_vertex(&mut self, x: f64, y: f64) -> Result<bool> {
        let p = Vect::new(x, y)?;
        Ok(match self.by_point.get(&p) {
            Some(&id) => {
                self.remove_vertex_id(id);
                true
            }
            None => false,
        })
    }

    /// Returns the vertex at exactly `p`, if any.
    #[must_use]
    pub fn vertex_at(&self, p: Vect) -> Option<VertexId> {
        self.by_point.get(&p).copied()
    }

    /// Returns the vertex at exactly `p`, creating an isolated one if needed.
    pub fn vertex_at_or_insert(&mut self, p: Vect) -> VertexId {
        if let Some(&id) = self.by_point.get(&p) {
            return id;
        }
        let id = self.vertices.insert(VertexData::new(p));
        self.by_point.insert(p, id);
        id
    }

    /// Returns the data of a vertex.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&VertexData> {
        self.vertices.get(id)
    }

    /// Position of a vertex known to be live.
    pub(crate) fn point(&self, id: VertexId) -> Vect {
        self.vertices[id].point
    }

    /// Neighbours of a vertex known to be live, clockwise from north.
    pub(crate) fn neighbors(&self, id: VertexId) -> &[VertexId] {
        &self.vertices[id].links
    }

    pub(crate) fn remove_vertex_id(&mut self, id: VertexId) {
        let neighbors = self.vertices[id].links.clone();
        for n in neighbors {
            self.unlink(id, n);
        }
        if let Some(data) = self.vertices.remove(id) {
            self.by_point.remove(&data.point);
        }
    }

    /// Moves every link of `from` onto `into` and deletes `from`.
    pub(crate) fn merge_vertex(&mut self, from: VertexId, into: VertexId) {
        if from == into {
            return;
        }
        let neighbors = self.vertices[from].links.clone();
        for n in neighbors {
            self.unlink(from, n);
            self.link(into, n);
        }
        self.remove_vertex_id(from);
    }

    /// Vertex ids in coordinate order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.by_point.values().copied()
    }

    /// Vertex positions in coordinate order.
    pub fn vertices(&self) -> impl Iterator<Item = Vect> + '_ {
        self.by_point.keys().copied()
    }

    /// Visits every vertex in coordinate order.
    pub fn for_each_vertex<F: FnMut(Vect, usize)>(&self, mut f: F) {
        for &id in self.by_point.values() {
            let data = &self.vertices[id];
            f(data.point, data.degree());
        }
    }

    // --- Link operations ---

    /// Adds a link between two coordinates, creating vertices as needed.
    ///
    /// Returns false if the link already exists or both ends coincide.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite coordinate.
    pub fn add_link(&mut self, ax: f64, ay: f64, bx: f64, by: f64) -> Result<bool> {
        let a = Vect::new(ax, ay)?;
        let b = Vect::new(bx, by)?;
        Ok(self.add_link_points(a, b))
    }

    /// Adds a link between two points, creating vertices as needed.
    pub fn add_link_points(&mut self, a: Vect, b: Vect) -> bool {
        if a == b {
            return false;
        }
        let ia = self.vertex_at_or_insert(a);
        let ib = self.vertex_at_or_insert(b);
        self.link(ia, ib)
    }

    /// Adds the links of a vertex path, closing it back to the start if
    /// `closed` is set.
    pub fn add_path(&mut self, points: &[Vect], closed: bool) {
        for pair in points.windows(2) {
            self.add_link_points(pair[0], pair[1]);
        }
        if closed && points.len() > 2 {
            self.add_link_points(points[points.len() - 1], points[0]);
        }
    }

    /// Removes the link between two coordinates.
    ///
    /// Vertices left without links are kept as isolated vertices.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite coordinate.
    pub fn remove_link(&mut self, ax: f64, ay: f64, bx: f64, by: f64) -> Result<bool> {
        let a = Vect::new(ax, ay)?;
        let b = Vect::new(bx, by)?;
        Ok(self.remove_link_points(a, b))
    }

    /// Removes the link between two points.
    pub fn remove_link_points(&mut self, a: Vect, b: Vect) -> bool {
        match (self.vertex_at(a), self.vertex_at(b)) {
            (Some(ia), Some(ib)) => self.unlink(ia, ib),
            _ => false,
        }
    }

    /// Returns true if the two points are directly linked.
    #[must_use]
    pub fn has_link(&self, a: Vect, b: Vect) -> bool {
        match (self.vertex_at(a), self.vertex_at(b)) {
            (Some(ia), Some(ib)) => self.vertices[ia].links.contains(&ib),
            _ => false,
        }
    }

    /// Inserts `b` into `a`'s adjacency and vice versa, keeping angular order.
    pub(crate) fn link(&mut self, a: VertexId, b: VertexId) -> bool {
        if a == b || self.vertices[a].links.contains(&b) {
            return false;
        }
        self.insert_sorted(a, b);
        self.insert_sorted(b, a);
        self.link_count += 1;
        true
    }

    pub(crate) fn unlink(&mut self, a: VertexId, b: VertexId) -> bool {
        let Some(pos) = self.vertices[a].links.iter().position(|&n| n == b) else {
            return false;
        };
        self.vertices[a].links.remove(pos);
        if let Some(pos) = self.vertices[b].links.iter().position(|&n| n == a) {
            self.vertices[b].links.remove(pos);
        }
        self.link_count -= 1;
        true
    }

    fn insert_sorted(&mut self, at: VertexId, neighbor: VertexId) {
        let origin = self.vertices[at].point;
        let target = self.vertices[neighbor].point;
        let links = &self.vertices[at].links;
        let idx = links.partition_point(|&n| {
            compare_around(origin, self.vertices[n].point, target) != std::cmp::Ordering::Greater
        });
        self.vertices[at].links.insert(idx, neighbor);
    }

    /// Writes the neighbours of `(x, y)` into `out`, clockwise from north.
    ///
    /// Returns false (leaving `out` empty) if there is no vertex there.
    pub fn get_links(&self, x: f64, y: f64, out: &mut Vec<Vect>) -> bool {
        out.clear();
        let Ok(p) = Vect::new(x, y) else {
            return false;
        };
        let Some(id) = self.vertex_at(p) else {
            return false;
        };
        out.extend(self.vertices[id].links.iter().map(|&n| self.vertices[n].point));
        true
    }

    /// Number of links incident to the vertex at `p` (0 if absent).
    #[must_use]
    pub fn degree(&self, p: Vect) -> usize {
        self.vertex_at(p).map_or(0, |id| self.vertices[id].degree())
    }

    /// The neighbour of `at` that follows `from` clockwise.
    ///
    /// With a single neighbour this is `from` itself.
    #[must_use]
    pub fn next_cw(&self, at: VertexId, from: VertexId) -> Option<VertexId> {
        let links = &self.vertices.get(at)?.links;
        let pos = links.iter().position(|&n| n == from)?;
        Some(links[(pos + 1) % links.len()])
    }

    /// The neighbour of `at` that follows `from` counter-clockwise.
    #[must_use]
    pub fn next_ccw(&self, at: VertexId, from: VertexId) -> Option<VertexId> {
        let links = &self.vertices.get(at)?.links;
        let pos = links.iter().position(|&n| n == from)?;
        Some(links[(pos + links.len() - 1) % links.len()])
    }

    /// Visits every link once, from its smaller to its larger endpoint.
    pub fn for_each_link<F: FnMut(Vect, Vect)>(&self, mut f: F) {
        for (&p, &id) in &self.by_point {
            for &n in &self.vertices[id].links {
                let q = self.vertices[n].point;
                if p < q {
                    f(p, q);
                }
            }
        }
    }

    /// All links, each once, in coordinate order.
    #[must_use]
    pub fn links(&self) -> Vec<Line> {
        let mut out = Vec::with_capacity(self.link_count);
        self.for_each_link(|a, b| out.push(Line::from_points(a, b)));
        out
    }

    /// Link endpoints as vertex ids, each link once.
    pub(crate) fn link_ids(&self) -> Vec<(VertexId, VertexId)> {
        let mut out = Vec::with_capacity(self.link_count);
        for (&p, &id) in &self.by_point {
            for &n in &self.vertices[id].links {
                if p < self.vertices[n].point {
                    out.push((id, n));
                }
            }
        }
        out
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn num_links(&self) -> usize {
        self.link_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounds of all vertices, or `None` for an empty network.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.vertices())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vect {
        Vect::new(x, y).unwrap()
    }

    #[test]
    fn links_are_symmetric() {
        let mut network = Network::new();
        assert!(network.add_link(0.0, 0.0, 1.0, 0.0).unwrap());
        assert!(!network.add_link(1.0, 0.0, 0.0, 0.0).unwrap());
        assert!(network.has_link(v(1.0, 0.0), v(0.0, 0.0)));
        assert_eq!(network.num_links(), 1);
        assert_eq!(network.num_vertices(), 2);
    }

    #[test]
    fn rejects_non_finite() {
        let mut network = Network::new();
        assert!(network.add_link(0.0, f64::NAN, 1.0, 0.0).is_err());
        assert!(network.add_vertex(f64::INFINITY, 0.0).is_err());
        assert!(network.is_empty());
    }

    #[test]
    fn zero_length_link_is_ignored() {
        let mut network = Network::new();
        assert!(!network.add_link(1.0, 1.0, 1.0, 1.0).unwrap());
        assert_eq!(network.num_links(), 0);
    }

    #[test]
    fn adjacency_is_clockwise_from_north() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, -1.0, 0.0).unwrap();
        network.add_link(0.0, 0.0, 0.0, -1.0).unwrap();
        network.add_link(0.0, 0.0, 1.0, 0.0).unwrap();
        network.add_link(0.0, 0.0, 0.0, 1.0).unwrap();
        let mut out = Vec::new();
        assert!(network.get_links(0.0, 0.0, &mut out));
        assert_eq!(out, vec![v(0.0, 1.0), v(1.0, 0.0), v(0.0, -1.0), v(-1.0, 0.0)]);
    }

    #[test]
    fn next_link_around_vertex() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 0.0, 1.0).unwrap();
        network.add_link(0.0, 0.0, 1.0, 0.0).unwrap();
        network.add_link(0.0, 0.0, -1.0, 0.0).unwrap();
        let at = network.vertex_at(v(0.0, 0.0)).unwrap();
        let north = network.vertex_at(v(0.0, 1.0)).unwrap();
        let east = network.vertex_at(v(1.0, 0.0)).unwrap();
        let west = network.vertex_at(v(-1.0, 0.0)).unwrap();
        assert_eq!(network.next_cw(at, north), Some(east));
        assert_eq!(network.next_cw(at, west), Some(north));
        assert_eq!(network.next_ccw(at, north), Some(west));
    }

    #[test]
    fn remove_link_keeps_isolated_vertices() {
        let mut network = Network::new();
        network.add_link(0.0, 0.0, 1.0, 0.0).unwrap();
        assert!(network.remove_link(0.0, 0.0, 1.0, 0.0).unwrap());
        assert_eq!(network.num_links(), 0);
        assert_eq!(network.num_vertices(), 2);
        assert_eq!(network.degree(v(0.0, 0.0)), 0);
    }

    #[test]
    fn remove_vertex_drops_incident_links() {
        let mut network = Network::new();
        network.add_path(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)], true);
        assert_eq!(network.num_links(), 3);
        assert!(network.remove_vertex(1.0, 0.0).unwrap());
        assert_eq!(network.num_links(), 1);
        assert_eq!(network.num_vertices(), 2);
    }

    #[test]
    fn for_each_link_visits_once() {
        let mut network = Network::new();
        network.add_path(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], true);
        let mut count = 0;
        network.for_each_link(|a, b| {
            assert!(a < b);
            count += 1;
        });
        assert_eq!(count, 4);
        assert_eq!(network.links().len(), 4);
    }
}
