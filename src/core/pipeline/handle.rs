//! Handles for scans running on a background thread.

use crate::error::ScanError;
use crate::events::ScanSummary;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use uuid::Uuid;

/// Cooperative cancellation flag, checked between traversal steps
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scan to stop at the next entry
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A scan started with [`ScanController::start`](super::ScanController::start)
pub struct ScanHandle {
    pub(super) scan_id: Uuid,
    pub(super) root: PathBuf,
    pub(super) cancel: CancellationToken,
    pub(super) thread: JoinHandle<Result<ScanSummary, ScanError>>,
}

impl ScanHandle {
    /// Identifier carried by every event of this scan
    pub fn scan_id(&self) -> Uuid {
        self.scan_id
    }

    /// The resolved root being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Request cancellation; partial results stay available
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the background thread has finished
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the scan ends and return its outcome
    pub fn await_completion(self) -> Result<ScanSummary, ScanError> {
        self.thread
            .join()
            .unwrap_or_else(|_| Err(ScanError::WorkerPanicked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();

        assert!(clone.is_cancelled());
    }
}
