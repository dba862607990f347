use super::{Matrix3, Vect};
use crate::error::Result;

/// 2D affine transform stored as a homogeneous 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3,
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wraps an affine matrix. The bottom row is expected to be `[0, 0, 1]`.
    #[must_use]
    pub fn from_matrix(matrix: Matrix3) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new_translation(&nalgebra::Vector2::new(dx, dy)),
        }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new_nonuniform_scaling(&nalgebra::Vector2::new(sx, sy)),
        }
    }

    /// Counter-clockwise rotation about the origin.
    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        Self {
            matrix: Matrix3::new_rotation(radians),
        }
    }

    /// Applies `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// True if the transform flips orientation (negative determinant).
    #[must_use]
    pub fn is_reflection(&self) -> bool {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] < 0.0
    }

    /// Maps a point through the transform.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if the mapped point overflows.
    pub fn apply(&self, p: Vect) -> Result<Vect> {
        let mapped = self.matrix.transform_point(&p.to_point());
        Vect::from_point(&mapped)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
