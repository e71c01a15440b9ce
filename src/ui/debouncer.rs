//! Quiet-period timer for releasing keyboard drags

use std::time::Duration;

use tokio::time::Instant;

/// Fires once no update has arrived for `duration`
pub struct Debouncer {
    duration: Duration,
    last_update: Option<Instant>,
}

impl Debouncer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_update: None,
        }
    }

    /// Returns `true` once if the quiet period has elapsed since the last update.
    #[must_use]
    pub fn query(&mut self) -> bool {
        if self
            .last_update
            .is_some_and(|last| last.elapsed() >= self.duration)
        {
            self.last_update = None;
            true
        } else {
            false
        }
    }

    /// Restarts the quiet period.
    pub fn update(&mut self) {
        self.last_update = Some(Instant::now());
    }

    /// Disarms the debouncer.
    pub fn cancel(&mut self) {
        self.last_update = None;
    }

    /// When the debouncer fires, if it is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_update.map(|last| last + self.duration)
    }
}
