//! Planar network topology.
//!
//! A [`Network`] is the mutable working graph behind every overlay and
//! buffer operation: segments go in, [`Network::explicit_intersections`]
//! makes it planar, and [`extract_rings`] reads the faces back out.

mod explicit;
mod extract;
mod network;
mod vertex;

pub use extract::{extract_boundaries, extract_rings};
pub use network::Network;
pub use vertex::{VertexData, VertexId};
