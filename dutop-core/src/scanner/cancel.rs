use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

/// Cancellation token for stopping scans
///
/// Write-once: the first `cancel` wins, later calls are no-ops. Besides the
/// flag, the token carries a channel that disconnects on cancel, so blocking
/// points can wait on `signal()` inside a `select!` and wake up immediately.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
        }
    }

    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        // Dropping the only sender disconnects every clone of `signal`.
        if let Ok(mut guard) = self.trigger.lock() {
            guard.take();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Becomes ready (disconnected) once cancelled; never carries a message
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
