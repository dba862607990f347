use crate::math::Vect;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a [`Network`](super::Network).
    pub struct VertexId;
}

/// Data associated with a network vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The position of the vertex.
    pub point: Vect,
    /// Neighbouring vertices, sorted clockwise from north around `point`.
    pub(crate) links: Vec<VertexId>,
}

impl VertexData {
    /// Creates an isolated vertex at the given point.
    #[must_use]
    pub fn new(point: Vect) -> Self {
        Self {
            point,
            links: Vec::new(),
        }
    }

    /// Neighbours in angular order.
    #[must_use]
    pub fn links(&self) -> &[VertexId] {
        &self.links
    }

    /// Number of incident links.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.links.len()
    }
}
