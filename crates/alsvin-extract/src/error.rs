//! Error types for the extraction crate.

use thiserror::Error;

/// Errors that can occur during circuit extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The input graph is not in graph-like form.
    #[error("graph is not graph-like: {0}")]
    NotGraphLike(&'static str),

    /// Input and output arity disagree.
    #[error("qubit mismatch: {inputs} inputs vs {outputs} outputs")]
    QubitMismatch {
        /// Number of input boundaries.
        inputs: usize,
        /// Number of output boundaries.
        outputs: usize,
    },

    /// No CNOT schedule reduces the frontier; indicates a bug upstream.
    #[error("extraction stalled: {0}")]
    ExtractionStalled(&'static str),

    /// Cooperative cancellation observed.
    #[error("extraction interrupted")]
    Interrupted,

    /// An underlying graph or circuit edit failed.
    #[error("graph edit failed during extraction: {0}")]
    Graph(#[from] alsvin_zx::ZxError),

    /// Building the output circuit failed.
    #[error("circuit build failed during extraction: {0}")]
    Circuit(#[from] alsvin_qcir::QcirError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
