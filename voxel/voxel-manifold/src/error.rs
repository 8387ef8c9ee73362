//! Error types for manifold meshing.

use thiserror::Error;

/// Result type for manifold meshing.
pub type ManifoldResult<T> = Result<T, ManifoldError>;

/// Errors raised while reconstructing a mesh from a voxel grid.
#[derive(Debug, Error)]
pub enum ManifoldError {
    /// A dual cell configuration has no entry in the dispatch table.
    ///
    /// The generated table is exhaustive, so this indicates internal
    /// corruption rather than bad input.
    #[error("unhandled cell configuration {config:#04x}")]
    UnhandledConfiguration {
        /// The 8-bit corner configuration.
        config: u8,
    },
}
