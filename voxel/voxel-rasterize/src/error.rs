//! Error types for rasterization.

use thiserror::Error;
use voxel_types::GridError;

/// Result type for rasterization operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised while voxelizing a mesh.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The target grid is invalid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The requested slice index is outside the grid.
    #[error("slice index {zi} out of range for grid with {nz} slices")]
    SliceOutOfRange {
        /// Requested Z slice.
        zi: u32,
        /// Number of slices in the grid.
        nz: u32,
    },

    /// The operation was cancelled through its token.
    #[error("voxelization cancelled")]
    Cancelled,
}
