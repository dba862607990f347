//! Conversions of geometry into rendering primitives: drawing paths and
//! triangle meshes.

mod path;
mod triangulate;

pub use path::{PathIter, PathSegment};
pub use triangulate::triangulate_area;

use crate::math::Vect;

/// A triangle mesh covering an area.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vect>,
    /// Triangle indices (each triple defines a counter-clockwise triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Sum of the triangle areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.indices
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| self.vertices[i as usize]);
                0.5 * (b - a).cross(c - a)
            })
            .sum()
    }
}
