use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};

/// Reported once per chunk, in chunk order.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadProgress {
    pub message: String,
    /// Only chunks that were fetched successfully
    pub loaded_segments: usize,
    pub total_segments: usize,
    /// Running total of records accumulated so far
    pub records: usize,
}

/// The state of one load, owned by whoever displays it. Once the owner cancels (because its view
/// went away), loads using this session stop reporting progress and abandon their results.
pub struct LoadSession {
    cancelled: Arc<AtomicBool>,
    progress: Option<UnboundedSender<LoadProgress>>,
}

/// Lets the owner of a session cancel it while a load is borrowing the session.
#[derive(Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl LoadSession {
    pub fn new() -> (Self, UnboundedReceiver<LoadProgress>) {
        let (tx, rx) = unbounded();
        let session = Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: Some(tx),
        };
        (session, rx)
    }

    /// A session nobody watches progress for.
    pub fn quiet() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancelled.clone())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Ends the session. The progress stream finishes, and anything still holding a cancel
    /// handle sees the session as cancelled.
    pub fn dispose(mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.progress.take();
    }

    pub(crate) fn report(&self, progress: LoadProgress) {
        if self.is_cancelled() {
            return;
        }
        debug!("{}", progress.message);
        if let Some(ref tx) = self.progress {
            // The receiver going away just means nobody is watching anymore
            let _ = tx.unbounded_send(progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(records: usize) -> LoadProgress {
        LoadProgress {
            message: format!("Found {records} items."),
            loaded_segments: 1,
            total_segments: 1,
            records,
        }
    }

    #[test]
    fn test_no_progress_after_cancel() {
        let (session, mut rx) = LoadSession::new();
        session.report(progress(1));
        session.cancel_handle().cancel();
        assert!(session.is_cancelled());
        session.report(progress(2));
        session.dispose();

        assert_eq!(rx.try_next().unwrap(), Some(progress(1)));
        // Closed, with nothing else queued
        assert_eq!(rx.try_next().unwrap(), None);
    }
}
