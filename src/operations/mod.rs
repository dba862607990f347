pub mod boolean;
pub mod buffer;
pub mod relate;
