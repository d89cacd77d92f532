use glam::Mat4;

use crate::error::PoseError;

/// Number of elements in a column-major 4x4 pose matrix.
pub const MATRIX_LEN: usize = 16;

/// Build a pose from foreign column-major data (JS typed arrays, recordings).
pub fn matrix_from_slice(values: &[f32]) -> Result<Mat4, PoseError> {
    if values.len() != MATRIX_LEN {
        return Err(PoseError::BadLength(values.len()));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(PoseError::NonFinite { index });
    }
    Ok(Mat4::from_cols_slice(values))
}

/// Column-major layout, the inverse of [`matrix_from_slice`].
pub fn matrix_to_array(matrix: &Mat4) -> [f32; MATRIX_LEN] {
    matrix.to_cols_array()
}
