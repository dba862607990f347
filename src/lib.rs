//! Planar network topology and boolean overlay for 2D polygons.
//!
//! Geometry values are immutable. Operations build a transient
//! [`topology::Network`], make every crossing explicit, and read the result
//! back as rings, lines and points.

pub mod codec;
pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{PolynetError, Result};
pub use geometry::Geometry;
pub use math::{Tolerance, Vect};
