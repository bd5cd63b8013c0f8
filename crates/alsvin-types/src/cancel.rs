//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cooperative cancellation flag.
///
/// Long-running operations (simplification fixed points, extraction,
/// routing search) poll the token at the top of each iteration and return
/// an `Interrupted` error when it is set. The partially processed graph or
/// device is left in a valid state.
///
/// Clones share the underlying flag, so a driver can hand the token to a
/// worker and cancel it from outside.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
