//! Cooperative cancellation for long exports

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{TallyError, TallyResult};

/// Shared flag a caller flips when it abandons a request
///
/// Clones share the flag. Exports check it before querying the store and
/// once per rendered row.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once the flag is set
    pub fn check(&self) -> TallyResult<()> {
        if self.is_cancelled() {
            Err(TallyError::Cancelled)
        } else {
            Ok(())
        }
    }
}
