//! Error types for the simplifier crate.

use alsvin_zx::ZxError;
use thiserror::Error;

/// Errors that can occur during simplification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimpError {
    /// A rule pass did not strictly decrease its monovariant. Indicates a
    /// rule bug; the driver disables the rule and continues.
    #[error("rule '{rule}' made no progress (monovariant {before} -> {after})")]
    NoProgress {
        /// The offending rule.
        rule: &'static str,
        /// Monovariant before the pass.
        before: u64,
        /// Monovariant after the pass.
        after: u64,
    },

    /// A match no longer satisfies its rule's precondition at apply time.
    #[error("rule '{rule}' match invalidated: {reason}")]
    InvalidMatch {
        /// The rule whose match broke.
        rule: &'static str,
        /// What was violated.
        reason: &'static str,
    },

    /// Cooperative cancellation observed.
    #[error("simplification interrupted")]
    Interrupted,

    /// An underlying graph edit failed.
    #[error(transparent)]
    Zx(#[from] ZxError),
}

/// Result type for simplifier operations.
pub type SimpResult<T> = Result<T, SimpError>;
