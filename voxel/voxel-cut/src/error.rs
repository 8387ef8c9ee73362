//! Error types for boolean subtraction.

use thiserror::Error;

/// Result type for cut operations.
pub type CutResult<T> = Result<T, CutError>;

/// Errors raised while cutting voxel models.
#[derive(Debug, Error)]
pub enum CutError {
    /// The base model has no voxels to cut from.
    #[error("base model must not be empty")]
    EmptyBase,
}
