//! Background ingestion processing

mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use worker::{IngestRun, IngestWorker};

/// Cooperative cancellation for a running ingestion
///
/// Checked before each file; work already done is not rolled back.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
