//! Bounding-box spatial index used to accelerate segment queries.
//!
//! The network's intersection search and the ring edge index only talk to
//! the [`SpatialIndex`] trait, so any correct bounding-box index can stand in
//! for the R-tree implementation provided here.

mod rtree;

pub use rtree::RTreeIndex;

use crate::math::Rect;

/// Bounding-box index over values of type `T`.
pub trait SpatialIndex<T> {
    /// Adds a value with its bounds.
    fn insert(&mut self, bounds: Rect, value: T);

    /// Removes every entry whose bounds lie entirely within `bounds`,
    /// returning the number removed.
    fn remove_all_in(&mut self, bounds: &Rect) -> usize;

    /// Visits entries whose bounds overlap the interior of `bounds`.
    fn for_each_overlapping<F: FnMut(&Rect, &T)>(&self, bounds: &Rect, f: F);

    /// Visits entries whose bounds overlap or touch `bounds`.
    fn for_each_interacting<F: FnMut(&Rect, &T)>(&self, bounds: &Rect, f: F);

    /// Rebuilds the index for query performance after many edits.
    fn optimise(&mut self);

    /// Number of entries in the index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
