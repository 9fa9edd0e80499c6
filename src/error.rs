//! Error types for seam.
//!
//! Data-validity problems (bad input indices, a simulation cell that is too
//! small for the surface it wraps) are reported through [`MeshError`].
//! Broken half-edge topology is a programming error and panics instead.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or processing meshes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has too few corners or repeats a vertex along its boundary.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The simulation cell matrix cannot be inverted.
    #[error("simulation cell matrix is singular (determinant {determinant})")]
    SingularCell {
        /// The determinant of the rejected cell matrix.
        determinant: f64,
    },

    /// A triangle spans more than half of the periodic cell.
    ///
    /// The cell is too small for the surface feature, so the face cannot be
    /// split at the periodic boundary.
    #[error("face {face} spans the periodic cell along dimension {dim}; the cell may be too small")]
    FaceSpansCell {
        /// The triangle index in the output mesh.
        face: usize,
        /// The periodic dimension being processed.
        dim: usize,
    },

    /// A face enters the periodic boundary plane but never leaves it.
    #[error("face {face} crosses the periodic boundary along dimension {dim} only once")]
    UnpairedSeamCrossing {
        /// The half-edge mesh face index.
        face: usize,
        /// The periodic dimension being processed.
        dim: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
