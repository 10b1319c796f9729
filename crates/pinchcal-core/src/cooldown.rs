#![forbid(unsafe_code)]

//! Shared rate limit for pinch emission.
//!
//! One [`CooldownClock`] exists per recognizer and is shared by the touch
//! pinch session and the wheel adapter, so the spacing guarantee holds
//! regardless of which source fires.

use web_time::{Duration, Instant};

/// Tracks when a pinch event was last emitted.
#[derive(Debug, Clone)]
pub struct CooldownClock {
    window: Duration,
    last_fired: Option<Instant>,
}

impl CooldownClock {
    /// A clock that has never fired.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    /// Whether an event may be emitted at `now`.
    ///
    /// A clock that never fired is always open. If `now` precedes the last
    /// emission the elapsed time counts as zero.
    #[must_use]
    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        }
    }

    /// Record an emission. Only call when an event is actually emitted.
    pub fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    #[inline]
    #[must_use]
    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }

    #[inline]
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }
}
