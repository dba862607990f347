use std::fmt;

use rstar::{RTree, RTreeObject, AABB};

use super::SpatialIndex;
use crate::math::Rect;

/// An indexed value together with its bounds.
#[derive(Debug, Clone, PartialEq)]
struct IndexEntry<T> {
    bounds: Rect,
    value: T,
}

impl<T> RTreeObject for IndexEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_envelope(&self.bounds)
    }
}

fn to_envelope(r: &Rect) -> AABB<[f64; 2]> {
    AABB::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y])
}

/// [`SpatialIndex`] backed by an `rstar` R-tree.
#[derive(Clone)]
pub struct RTreeIndex<T> {
    tree: RTree<IndexEntry<T>>,
}

impl<T> RTreeIndex<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Builds an index in one pass, which yields a better tree than
    /// repeated insertion.
    #[must_use]
    pub fn bulk_load(items: Vec<(Rect, T)>) -> Self {
        let entries = items
            .into_iter()
            .map(|(bounds, value)| IndexEntry { bounds, value })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }
}

impl<T> Default for RTreeIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RTreeIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl<T: Clone + PartialEq> SpatialIndex<T> for RTreeIndex<T> {
    fn insert(&mut self, bounds: Rect, value: T) {
        self.tree.insert(IndexEntry { bounds, value });
    }

    fn remove_all_in(&mut self, bounds: &Rect) -> usize {
        let doomed: Vec<IndexEntry<T>> = self
            .tree
            .locate_in_envelope(&to_envelope(bounds))
            .cloned()
            .collect();
        doomed
            .iter()
            .filter(|entry| self.tree.remove(entry).is_some())
            .count()
    }

    fn for_each_overlapping<F: FnMut(&Rect, &T)>(&self, bounds: &Rect, mut f: F) {
        for entry in self
            .tree
            .locate_in_envelope_intersecting(&to_envelope(bounds))
        {
            if entry.bounds.overlaps(bounds) {
                f(&entry.bounds, &entry.value);
            }
        }
    }

    fn for_each_interacting<F: FnMut(&Rect, &T)>(&self, bounds: &Rect, mut f: F) {
        for entry in self
            .tree
            .locate_in_envelope_intersecting(&to_envelope(bounds))
        {
            if entry.bounds.interacts(bounds) {
                f(&entry.bounds, &entry.value);
            }
        }
    }

    fn optimise(&mut self) {
        let entries: Vec<IndexEntry<T>> = self.tree.iter().cloned().collect();
        self.tree = RTree::bulk_load(entries);
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vect;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::from_corners(Vect::new(x0, y0).unwrap(), Vect::new(x1, y1).unwrap())
    }

    fn sample() -> RTreeIndex<usize> {
        RTreeIndex::bulk_load(vec![
            (rect(0.0, 0.0, 1.0, 1.0), 0),
            (rect(1.0, 0.0, 2.0, 1.0), 1),
            (rect(5.0, 5.0, 6.0, 6.0), 2),
        ])
    }

    #[test]
    fn interacting_includes_touching() {
        let index = sample();
        let mut hits = Vec::new();
        index.for_each_interacting(&rect(0.0, 0.0, 1.0, 1.0), |_, v| hits.push(*v));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn overlapping_excludes_touching() {
        let index = sample();
        let mut hits = Vec::new();
        index.for_each_overlapping(&rect(0.0, 0.0, 1.0, 1.0), |_, v| hits.push(*v));
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn remove_all_in_box() {
        let mut index = sample();
        assert_eq!(index.remove_all_in(&rect(-1.0, -1.0, 3.0, 3.0)), 2);
        assert_eq!(index.len(), 1);
        index.insert(rect(0.0, 0.0, 1.0, 1.0), 7);
        index.optimise();
        assert_eq!(index.len(), 2);
    }
}
