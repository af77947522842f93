//! Trailing-edge debounce for bursty events such as viewport resizes

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Coalesces a burst of values into one call with the last value, fired once
/// no new value has arrived for `delay`.
///
/// The background task is aborted when the debouncer is cancelled or dropped;
/// a pending value is then discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    sender: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F>(delay: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = receiver.recv().await {
                let mut coalesced = 0usize;
                loop {
                    tokio::select! {
                        next = receiver.recv() => match next {
                            Some(value) => {
                                latest = value;
                                coalesced += 1;
                            }
                            None => break,
                        },
                        _ = sleep(delay) => break,
                    }
                }
                debug!("Debounce settled after coalescing {} events", coalesced);
                on_settle(latest);
            }
        });

        Self { sender, task }
    }

    /// Queue a value; returns false once the debouncer has been cancelled
    pub fn push(&self, value: T) -> bool {
        !self.task.is_finished() && self.sender.send(value).is_ok()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
