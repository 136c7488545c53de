//! Countdown clock.
//!
//! The clock only counts. Scheduling the one-second ticks is the runtime's
//! job (see [`crate::schedule::Interval`]), and formatting is the view's.

/// Countdown of whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    remaining: u32,
    armed: bool,
}

impl Clock {
    /// Creates a disarmed clock showing `seconds`.
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            armed: false,
        }
    }

    /// Arms the clock with a fresh countdown.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.armed = true;
    }

    /// Disarms the clock. Stopping a stopped clock is a no-op.
    pub fn stop(&mut self) {
        self.armed = false;
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `true` exactly when this tick brought the counter to zero.
    /// Ticks on a disarmed or expired clock change nothing.
    pub fn tick(&mut self) -> bool {
        if !self.armed || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Seconds left in the current countdown.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    /// Whether ticks are currently counted.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
