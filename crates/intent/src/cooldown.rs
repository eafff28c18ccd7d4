//! Cooldown Gate - debounces repeated actions
//!
//! Speech recognizers often emit the same utterance twice in a row (partial
//! then final result). Only the first of two actions closer than the window
//! goes through.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: Duration,
    last_action: Option<Instant>,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_action: None,
        }
    }

    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// Try to take the gate now (monotonic clock).
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Try to take the gate at `now`.
    ///
    /// Returns false while the window since the last accepted action is still
    /// open. On success the timestamp advances to `now` (never backwards).
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_action {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
            self.last_action = Some(last.max(now));
        } else {
            self.last_action = Some(now);
        }
        true
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn last_action(&self) -> Option<Instant> {
        self.last_action
    }
}
