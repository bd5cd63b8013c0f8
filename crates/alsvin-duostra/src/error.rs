//! Error types for the Duostra crate.

use thiserror::Error;

/// Errors that can occur while mapping a circuit onto a device.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DuostraError {
    /// More logical qubits than the device has physical ones.
    #[error("circuit has {logical} logical qubits but the device has {physical} physical qubits")]
    ArityMismatch {
        /// Logical qubit count.
        logical: usize,
        /// Physical qubit count.
        physical: usize,
    },

    /// A placement is not an injective map onto the device.
    #[error("invalid placement: {0}")]
    InvalidPlacement(&'static str),

    /// No route exists between two physical qubits.
    #[error("no route between physical qubits {p0} and {p1}")]
    RoutingFailed {
        /// First physical qubit.
        p0: usize,
        /// Second physical qubit.
        p1: usize,
    },

    /// A logical qubit is not bound to any physical qubit.
    #[error("logical qubit {0} is not placed on the device")]
    UnplacedQubit(u32),

    /// Unrecognized configuration option.
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    /// A configuration option received an unusable value.
    #[error("invalid value '{value}' for option '{key}'")]
    InvalidOptionValue {
        /// The option name.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// Device-description parse failure.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The emitted operation sequence does not realize the logical circuit.
    #[error("mapping equivalence check failed: {0}")]
    MappingCheckFailed(String),

    /// Cooperative cancellation observed.
    #[error("mapping interrupted")]
    Interrupted,

    /// Building the physical circuit failed.
    #[error(transparent)]
    Circuit(#[from] alsvin_qcir::QcirError),
}

/// Result type for Duostra operations.
pub type DuostraResult<T> = Result<T, DuostraError>;
