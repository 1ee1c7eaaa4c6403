use std::sync::{atomic, Arc};

use once_cell::sync::Lazy;

/// Process wide tracker, for hosts with a single evaluation worker.
pub static RUNNING_TRACKER: Lazy<Arc<RunningTracker>> =
    Lazy::new(|| Arc::new(RunningTracker::new()));

/// Cooperative cancellation shared by a host and its worker.
///
/// The worker checks [`RunningTracker::is_running`] between records; a
/// record in flight always finishes.
#[derive(Debug, Default)]
pub struct RunningTracker {
    cancelled: atomic::AtomicBool,
}

impl RunningTracker {
    pub fn new() -> Self {
        RunningTracker {
            cancelled: atomic::AtomicBool::new(false),
        }
    }

    pub fn cancel(&self, reason: &str) {
        self.cancelled.store(true, atomic::Ordering::Release);
        log::info!("Cancel {}", reason);
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled.load(atomic::Ordering::Acquire)
    }
}
