//! Error types for fixture engraving.

use std::path::PathBuf;

use mesh_boolean::BooleanError;
use mesh_io::IoError;
use thiserror::Error;

/// Errors raised while producing one engraved fixture or preparing a batch.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// No embedded mesh exists under the key.
    #[error("no embedded mesh named {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// An embedded blob exists but is not a valid STL.
    #[error("embedded mesh {key:?} could not be decoded")]
    Decode {
        /// The key that was looked up.
        key: String,
        /// Underlying decoder error.
        #[source]
        source: IoError,
    },

    /// The tag could not be subtracted from the fixture.
    #[error("engraving {identifier} failed")]
    Boolean {
        /// Identifier being engraved.
        identifier: String,
        /// Underlying engine error.
        #[source]
        source: BooleanError,
    },

    /// The output file could not be written.
    #[error("cannot write {}", path.display())]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// The output directory could not be created or emptied.
    #[error("cannot prepare output directory {}", path.display())]
    Directory {
        /// The directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Coarse failure category, as reported per batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A mesh was missing from the library or could not be decoded.
    Lookup,
    /// The boolean subtraction failed.
    Boolean,
    /// The output file could not be written.
    Write,
    /// The output directory could not be prepared.
    Directory,
}

impl FixtureError {
    /// The failure category of this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } | Self::Decode { .. } => FailureKind::Lookup,
            Self::Boolean { .. } => FailureKind::Boolean,
            Self::Write { .. } => FailureKind::Write,
            Self::Directory { .. } => FailureKind::Directory,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lookup => "lookup failure",
            Self::Boolean => "boolean failure",
            Self::Write => "write failure",
            Self::Directory => "directory failure",
        };
        f.write_str(name)
    }
}

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
