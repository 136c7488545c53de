//! Session phases and durations.

use std::fmt;

/// Length of a work phase (25 minutes).
pub const WORK_DURATION_SECS: u32 = 25 * 60;

/// Length of a break phase (5 minutes).
pub const BREAK_DURATION_SECS: u32 = 5 * 60;

/// The session's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Working,
    OnBreak,
}

impl Phase {
    /// Whether a session is running (clock and pollers armed).
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::Working => "Working",
            Self::OnBreak => "On break",
        };
        f.write_str(label)
    }
}

/// Work and break lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work_secs: u32,
    pub break_secs: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_secs: WORK_DURATION_SECS,
            break_secs: BREAK_DURATION_SECS,
        }
    }
}

/// Snapshot of the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    /// Ordinal of the current work round, starting at 1.
    pub session_index: u32,
    pub remaining_seconds: u32,
}

/// Phase change produced by a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Working → OnBreak.
    BreakStarted,
    /// OnBreak → Working, entering round `session_index`.
    WorkResumed { session_index: u32 },
}
