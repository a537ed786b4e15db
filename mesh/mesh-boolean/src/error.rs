//! Error types for boolean operations.

use thiserror::Error;

/// Errors that can occur during boolean operations.
#[derive(Debug, Error)]
pub enum BooleanError {
    /// One or both input meshes are empty.
    #[error("empty mesh: {details}")]
    EmptyMesh {
        /// Description of which mesh is empty.
        details: String,
    },

    /// Input mesh has zero-area faces or encloses no volume.
    #[error("degenerate mesh: {details}")]
    DegenerateMesh {
        /// Description of the degeneracy.
        details: String,
    },

    /// Input mesh is not closed, so inside and outside are undefined.
    #[error("open mesh {mesh}: {open_edges} unmatched edges")]
    OpenMesh {
        /// Which mesh ("A" or "B").
        mesh: String,
        /// Number of directed edges without an opposite half-edge.
        open_edges: usize,
    },

    /// Input references vertices that do not exist.
    #[error("invalid index in {mesh}: face {face} references vertex {index}")]
    InvalidIndex {
        /// Which mesh ("A" or "B").
        mesh: String,
        /// Offending face.
        face: usize,
        /// Out-of-range vertex index.
        index: u32,
    },

    /// The operation produced a surface that does not bound a solid.
    #[error("result is not a closed solid: {open_edges} unmatched edges")]
    NonManifoldResult {
        /// Number of directed edges without an opposite half-edge.
        open_edges: usize,
    },

    /// The result is closed but its volume contradicts the operation.
    #[error("inconsistent result: {details}")]
    InconsistentResult {
        /// What the volumes were.
        details: String,
    },
}

/// Result type for boolean operations.
pub type BooleanResult<T> = Result<T, BooleanError>;
