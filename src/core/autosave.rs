//! Debounced autosave.
//!
//! Every change calls [`Debouncer::schedule`], which aborts the task still
//! waiting from the previous change and spawns a new one. Only the last task
//! of a burst gets to fire. The task itself does no I/O: it sends a message
//! back to the event loop, which owns the document and does the write.

use std::time::Duration;

use log::debug;
use tokio::task::AbortHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `fire` after the delay unless another schedule or a cancel
    /// arrives first. Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });
        self.pending = Some(handle.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Autosave rescheduled");
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const DELAY: Duration = Duration::from_millis(20);

    async fn settle() {
        tokio::time::sleep(DELAY * 6).await;
    }

    #[tokio::test]
    async fn test_burst_fires_once_with_last_value() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(DELAY);
        for i in 0..5 {
            let tx = tx.clone();
            debouncer.schedule(move || {
                let _ = tx.send(i);
            });
        }
        assert!(debouncer.is_pending());
        settle().await;
        let fired: Vec<i32> = rx.try_iter().collect();
        assert_eq!(fired, vec![4]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_prevents_firing() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(move || {
            let _ = tx.send(());
        });
        debouncer.cancel();
        settle().await;
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_task() {
        let (tx, rx) = mpsc::channel();
        {
            let mut debouncer = Debouncer::new(DELAY);
            debouncer.schedule(move || {
                let _ = tx.send(());
            });
        }
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_separate_bursts_each_fire() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(DELAY);
        for i in 0..2 {
            let tx = tx.clone();
            debouncer.schedule(move || {
                let _ = tx.send(i);
            });
            settle().await;
        }
        let fired: Vec<i32> = rx.try_iter().collect();
        assert_eq!(fired, vec![0, 1]);
    }
}
