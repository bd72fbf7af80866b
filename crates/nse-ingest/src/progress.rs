//! Run progress tracking.
//!
//! Shared between the ingester and whoever reports on it (the binary
//! logs it; a long-lived host could expose it).

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Fetching,
    Done,
    Failed,
}

/// Point-in-time progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    pub status: RunStatus,
    /// Listings handled so far in the current window.
    pub processed: usize,
    /// Size of the current window.
    pub total: usize,
}

impl RunProgress {
    /// Completion in whole percent. An empty window counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return if self.status == RunStatus::Idle { 0 } else { 100 };
        }
        let pct = self.processed.min(self.total) * 100 / self.total;
        pct as u8
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self {
            status: RunStatus::Idle,
            processed: 0,
            total: 0,
        }
    }
}

/// Cloneable handle to shared progress.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    inner: Arc<RwLock<RunProgress>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a window of `total` listings.
    pub fn begin(&self, total: usize) {
        *self.inner.write() = RunProgress {
            status: RunStatus::Fetching,
            processed: 0,
            total,
        };
    }

    /// One more listing handled.
    pub fn advance(&self) {
        let mut p = self.inner.write();
        if p.processed < p.total {
            p.processed += 1;
        }
    }

    pub fn finish(&self) {
        self.inner.write().status = RunStatus::Done;
    }

    pub fn fail(&self) {
        self.inner.write().status = RunStatus::Failed;
    }

    pub fn snapshot(&self) -> RunProgress {
        self.inner.read().clone()
    }
}
