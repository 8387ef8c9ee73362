//! Error types for shell merging.

use thiserror::Error;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors raised while building or merging shells.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The regions being merged were voxelized at different resolutions.
    #[error("incompatible resolution: shell has {shell} voxels/mm, model has {model}")]
    IncompatibleResolution {
        /// The shell's voxels per millimeter.
        shell: f64,
        /// The incoming model's voxels per millimeter.
        model: f64,
    },

    /// The operation was cancelled through its token.
    #[error("merge cancelled")]
    Cancelled,
}
