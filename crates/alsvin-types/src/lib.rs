//! Shared leaf types for the Alsvin stack.
//!
//! This crate holds the types that every layer of the stack speaks:
//!
//! - [`Phase`]: an exact rational multiple of π, the phase carried by
//!   spiders and rotation gates. All phase arithmetic in Alsvin is exact;
//!   no floating point is involved anywhere in the rewrite engine.
//! - [`CancelToken`]: a cooperative cancellation flag polled by every
//!   long-running loop (simplification passes, extraction, routing search).
//!
//! # Example
//!
//! ```rust
//! use alsvin_types::Phase;
//!
//! let quarter = Phase::new(1, 4);
//! assert_eq!(quarter + quarter, Phase::new(1, 2));
//! assert!((quarter * 4).is_pi());
//!
//! // Phases normalize into (-π, π]:
//! assert_eq!(Phase::new(3, 2), Phase::new(-1, 2));
//! ```

pub mod cancel;
pub mod phase;

pub use cancel::CancelToken;
pub use phase::{Phase, PhaseParseError};
