use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Counts effect tasks that have been spawned but not yet finished.
#[derive(Clone, Default)]
pub struct InflightTracker {
    count: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl InflightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one running task. The task is finished when the guard drops.
    pub fn enter(&self) -> InflightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InflightGuard {
            tracker: self.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once no task is in flight.
    pub async fn wait_idle(&self) {
        loop {
            // Register before reading the counter so a guard dropped in
            // between still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the in-flight count on drop, even if the task panicked.
pub struct InflightGuard {
    tracker: InflightTracker,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        if self.tracker.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.notify.notify_waiters();
        }
    }
}
