//! Error types for voxel grid validation.

use thiserror::Error;

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised by [`crate::VoxelGrid`] validation.
#[derive(Debug, Error)]
pub enum GridError {
    /// One or more grid dimensions are zero.
    #[error("grid dimensions must be non-zero ({nx},{ny},{nz})")]
    EmptyDimensions {
        /// Voxel count along X.
        nx: u32,
        /// Voxel count along Y.
        ny: u32,
        /// Voxel count along Z.
        nz: u32,
    },

    /// The uniform scale is zero or negative.
    #[error("grid scale must be positive (got {scale})")]
    InvalidScale {
        /// The offending scale in millimeters.
        scale: f64,
    },
}
