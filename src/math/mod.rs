pub mod angle;
pub mod line;
pub mod polygon_2d;
pub mod rect;
pub mod tolerance;
pub mod transform;
pub mod vect;

pub use line::Line;
pub use rect::Rect;
pub use tolerance::Tolerance;
pub use transform::Transform;
pub use vect::{Vect, VectBuilder};

/// 2D point type used at the nalgebra boundary.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type used at the nalgebra boundary.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix for 2D affine transforms.
pub type Matrix3 = nalgebra::Matrix3<f64>;
