mod linearizer;
mod offset;

pub use linearizer::Linearizer;
pub use offset::Buffer;
