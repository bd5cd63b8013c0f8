//! Error types for the circuit IR crate.

use crate::gate::QubitId;
use thiserror::Error;

/// Errors that can occur building circuits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QcirError {
    /// Qubit index beyond the circuit width.
    #[error("qubit {qubit} out of range for a {width}-qubit circuit")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// The circuit width.
        width: usize,
    },

    /// Gate applied with the wrong number of operands.
    #[error("gate '{gate}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate: &'static str,
        /// Expected operand count.
        expected: usize,
        /// Provided operand count.
        got: usize,
    },

    /// The same qubit used twice in one gate.
    #[error("duplicate qubit {0} in gate operands")]
    DuplicateQubit(QubitId),
}

/// Result type for circuit operations.
pub type QcirResult<T> = Result<T, QcirError>;
