//! Outstanding-producer accounting for graceful shutdown
//!
//! Every async log call holds a [`ProducerTicket`] from the moment it is
//! issued until its payload has been handed to the queue (or the send
//! failed). `close` waits on [`ProducerTracker::wait_idle`] before it drops
//! the queue sender.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub(crate) struct ProducerTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl ProducerTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register one in-flight producer. Must be called before the producer
    /// task is spawned.
    pub(crate) fn begin(self: &Arc<Self>) -> ProducerTicket {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        ProducerTicket {
            tracker: Arc::clone(self),
        }
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Resolve once no producer is outstanding
    pub(crate) async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking the counter so a concurrent drop to
            // zero cannot be missed.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the outstanding count when dropped
#[derive(Debug)]
pub(crate) struct ProducerTicket {
    tracker: Arc<ProducerTracker>,
}

impl Drop for ProducerTicket {
    fn drop(&mut self) {
        if self.tracker.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.tracker.idle.notify_waiters();
        }
    }
}
