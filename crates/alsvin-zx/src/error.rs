//! Error types for the ZX-graph crate.

use crate::vertex::VertexId;
use thiserror::Error;

/// Errors that can occur editing or parsing ZX-graphs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ZxError {
    /// Vertex id does not name a live vertex.
    #[error("vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    /// Edge addition would violate a structural invariant.
    #[error("invalid edge between {0} and {1}: {2}")]
    InvalidEdge(VertexId, VertexId, &'static str),

    /// Composition of graphs with unequal boundary arity.
    #[error("arity mismatch: {outputs} outputs composed with {inputs} inputs")]
    ArityMismatch {
        /// Output count of the left graph.
        outputs: usize,
        /// Input count of the right graph.
        inputs: usize,
    },

    /// Two boundaries of the same direction share a qubit index.
    #[error("duplicate {} qubit index {qubit}", if *.is_input { "input" } else { "output" })]
    DuplicateQubitIndex {
        /// The colliding qubit index.
        qubit: i32,
        /// Whether the collision is among inputs or outputs.
        is_input: bool,
    },

    /// Text-format parse failure.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Result type for ZX-graph operations.
pub type ZxResult<T> = Result<T, ZxError>;
