use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, select};

use super::cancel::CancellationToken;

/// Counting semaphore bounding concurrent directory listings
///
/// A bounded channel is the token store: acquiring sends into it (blocking
/// while full), releasing receives one back out.
#[derive(Debug)]
pub struct TokenPool {
    acquire: Sender<()>,
    release: Receiver<()>,
    capacity: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

/// A held token; released on drop
#[derive(Debug)]
pub struct Token<'a> {
    pool: &'a TokenPool,
}

impl TokenPool {
    /// Capacity below 1 is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (acquire, release) = crossbeam_channel::bounded(capacity);
        Self {
            acquire,
            release,
            capacity,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Wait for a free token, or give up once `cancel` fires
    pub fn acquire(&self, cancel: &CancellationToken) -> Option<Token<'_>> {
        if cancel.is_cancelled() {
            return None;
        }
        select! {
            send(self.acquire, ()) -> res => res.ok()?,
            recv(cancel.signal()) -> _ => return None,
        }

        let now = self.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Some(Token { pool: self })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn in_use(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    /// Most tokens ever held at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for Token<'_> {
    fn drop(&mut self) {
        self.pool.in_use.fetch_sub(1, Ordering::SeqCst);
        let _ = self.pool.release.try_recv();
    }
}
