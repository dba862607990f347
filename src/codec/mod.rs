//! Debugging and test encodings of geometry values.

pub mod binary;
pub mod text;

pub use binary::BinaryCodec;
pub use text::{from_value, to_value};
