//! Error types for STL I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing STL data.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The data is not parseable STL.
    #[error("invalid STL content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary data shorter than the fixed header plus face count.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual number of bytes available.
        got: usize,
    },

    /// Binary data ends before the declared number of triangles.
    #[error("truncated STL: header declares {expected} triangles, found {got}")]
    InvalidFaceCount {
        /// Triangles declared in the header.
        expected: u32,
        /// Complete triangles present.
        got: u32,
    },

    /// The mesh cannot be represented as STL.
    #[error("mesh cannot be written as STL: {details}")]
    InvalidMesh {
        /// What is wrong with the mesh.
        details: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error in ASCII STL.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
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
