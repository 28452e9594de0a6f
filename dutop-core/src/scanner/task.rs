use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Sender, select};

use super::cancel::CancellationToken;
use super::record::FileRecord;

/// Tracks outstanding walk tasks and owns the producer side of the record
/// channel
///
/// Every `WalkTask` holds one sender clone, so the record channel
/// disconnects exactly when the barrier and all tasks are gone. That
/// disconnect is the consumer's "all walks finished" signal.
#[derive(Debug)]
pub struct TaskBarrier {
    outstanding: Arc<AtomicUsize>,
    records: Sender<FileRecord>,
}

/// Membership of one walk task in a `TaskBarrier`; leaves it on drop
#[derive(Debug)]
pub struct WalkTask {
    outstanding: Arc<AtomicUsize>,
    records: Sender<FileRecord>,
}

impl TaskBarrier {
    pub fn new(records: Sender<FileRecord>) -> Self {
        Self {
            outstanding: Arc::new(AtomicUsize::new(0)),
            records,
        }
    }

    /// Register a new root task
    pub fn enter(&self) -> WalkTask {
        WalkTask::join(&self.outstanding, &self.records)
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

impl WalkTask {
    fn join(outstanding: &Arc<AtomicUsize>, records: &Sender<FileRecord>) -> Self {
        outstanding.fetch_add(1, Ordering::SeqCst);
        Self {
            outstanding: Arc::clone(outstanding),
            records: records.clone(),
        }
    }

    /// Register a child task, before it is spawned
    pub fn fork(&self) -> WalkTask {
        WalkTask::join(&self.outstanding, &self.records)
    }

    /// Hand a record to the consumer
    ///
    /// Blocks until the consumer takes it. Returns `false` if the scan was
    /// cancelled or the consumer is gone, in which case the record is dropped
    /// and the task should stop.
    pub fn emit(&self, record: FileRecord, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        select! {
            send(self.records, record) -> res => res.is_ok(),
            recv(cancel.signal()) -> _ => false,
        }
    }
}

impl Drop for WalkTask {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
