//! Outstanding-lookup counter for one album run.
//!
//! Every lookup holds an [`InFlight`] guard. Dropping the guard decrements
//! the counter and records a finished lookup, whichever way the lookup
//! ended, so "still loading" stays accurate under errors and early returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared counter; clone it into every task of the same run.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    pending: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Count a lookup as started.
    pub fn begin(&self) -> InFlight {
        self.pending.fetch_add(1, Ordering::AcqRel);
        InFlight {
            tracker: self.clone(),
        }
    }

    /// Lookups currently outstanding.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Lookups that have completed or failed.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Relaxed)
    }

    pub fn is_loading(&self) -> bool {
        self.pending() > 0
    }

    fn finish(&self) {
        // Only guards decrement, so this never underflows
        self.pending.fetch_sub(1, Ordering::AcqRel);
        self.finished.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for one outstanding lookup.
#[derive(Debug)]
pub struct InFlight {
    tracker: RequestTracker,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}
