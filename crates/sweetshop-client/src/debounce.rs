//! Latest-value-wins debouncing for search input.

use std::time::Duration;
use tokio::sync::mpsc;

/// Create a sender/debouncer pair. Values sent in quick succession collapse
/// into the last one, delivered once `delay` passes without another value.
pub fn debounce<T>(delay: Duration, capacity: usize) -> (mpsc::Sender<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, Debouncer { rx, delay })
}

pub struct Debouncer<T> {
    rx: mpsc::Receiver<T>,
    delay: Duration,
}

impl<T> Debouncer<T> {
    /// Wait for the next settled value. A pending value is flushed when all
    /// senders are dropped; after that `None` is returned.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            match tokio::time::timeout(self.delay, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}
