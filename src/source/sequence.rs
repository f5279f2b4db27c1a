//! Request sequencing for rapid navigation.
//!
//! Each load takes a ticket; only the result holding the latest ticket may
//! replace what is on screen, so a slow response for an older interval cannot
//! overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter shared by all loads of one screen.
#[derive(Debug, Clone, Default)]
pub struct FetchSequence {
    latest: Arc<AtomicU64>,
}

impl FetchSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request and return its ticket.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` belongs to the most recent request.
    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Ticket of the most recent request (0 before the first).
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
