//! Delays values until input has been quiet for a while.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Emits the last pushed value once no new value arrived for `delay`.
///
/// Each [`Debouncer::push`] cancels the pending emission and restarts the
/// timer. Dropping the debouncer does not cancel an emission already
/// scheduled, so the receiver still sees the final value before closing.
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver may be gone during shutdown
            let _ = tx.send(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending debounced value");
            }
            handle.abort();
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_of_burst_is_emitted() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));

        debouncer.push("c");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("cr");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("cry");
        drop(debouncer);

        assert_eq!(rx.recv().await, Some("cry"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_separated_by_quiet_periods_are_all_emitted() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));

        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.push(2);
        drop(debouncer);

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));

        debouncer.push("cards");
        debouncer.cancel();
        drop(debouncer);

        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emission_waits_for_delay() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        let start = tokio::time::Instant::now();

        debouncer.push("rates");
        assert_eq!(rx.recv().await, Some("rates"));
        assert!(start.elapsed() >= debouncer.delay());
    }
}
