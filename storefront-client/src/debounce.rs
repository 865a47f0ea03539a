//! Trailing-edge debouncer
//!
//! Every [`Debouncer::push`] restarts the quiet period; only the last
//! value survives. Time comes from `tokio::time`, so paused-clock tests
//! control it.

use std::time::Duration;

use tokio::time::Instant;

/// Search box quiet period
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the quiet period
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period has passed
    pub fn ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= Instant::now() => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Wait out the quiet period, then take the pending value
    pub async fn settle(&mut self) -> Option<T> {
        let deadline = self.pending.as_ref().map(|(_, deadline)| *deadline)?;
        tokio::time::sleep_until(deadline).await;
        self.pending.take().map(|(value, _)| value)
    }

    /// Take the pending value now, skipping the wait
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
