use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A single cancelable pending action
///
/// Each [`schedule`](Self::schedule) aborts the previous timer and bumps the
/// generation; the event is tagged with it so a timer that fired just before
/// being replaced can still be recognised as stale by [`accept`](Self::accept).
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Replace any pending action with a new one firing after the delay
    pub fn schedule<E, F>(&mut self, tx: &mpsc::UnboundedSender<E>, make_event: F) -> u64
    where
        E: Send + 'static,
        F: FnOnce(u64) -> E + Send + 'static,
    {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let delay = self.delay;
        let tx = tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(make_event(generation));
        }));

        generation
    }

    /// Whether an event carrying `generation` is the latest scheduled one
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }

    /// Drop the pending action, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
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

    #[tokio::test(start_paused = true)]
    async fn test_last_schedule_wins() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(&tx, |g| (g, "a"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(&tx, |g| (g, "ab"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        let last = debouncer.schedule(&tx, |g| (g, "abc"));

        let (generation, text) = rx.recv().await.unwrap();
        assert_eq!(generation, last);
        assert_eq!(text, "abc");
        assert!(debouncer.accept(generation));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        let first = debouncer.schedule(&tx, |g| g);
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, first);

        // Replaced before the fired event was handled
        debouncer.schedule(&tx, |g| g);
        assert!(!debouncer.accept(fired));
        assert!(debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        debouncer.schedule(&tx, |g| g);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
