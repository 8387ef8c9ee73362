//! Error types for codec operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for codec operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors raised while reading or writing voxel and mesh files.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The file does not start with the expected magic line.
    #[error("bad magic: expected {expected:?}, got {got:?}")]
    BadMagic {
        /// The magic the codec expected.
        expected: &'static str,
        /// What the file actually started with.
        got: String,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// A read window with negative or out-of-range indices.
    #[error("invalid window: start=({sx},{sy},{sz}) count=({cx},{cy},{cz})")]
    InvalidWindow {
        /// Start index along X.
        sx: i32,
        /// Start index along Y.
        sy: i32,
        /// Start index along Z.
        sz: i32,
        /// Count along X.
        cx: i32,
        /// Count along Y.
        cy: i32,
        /// Count along Z.
        cz: i32,
    },

    /// Run-length data continued past the declared dimensions.
    #[error("run-length encoding overrun: x index={index}, x dim={dim}")]
    RunLengthOverrun {
        /// X index the decoder reached.
        index: i64,
        /// Declared X dimension.
        dim: i64,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file while reading {context}")]
    UnexpectedEof {
        /// What was being read when the data ran out.
        context: &'static str,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
