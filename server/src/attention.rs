//! Attention tracking.
//!
//! The capture process reports what it sees one observation at a time
//! (`eyes_closed`, `eyes_open`, `yawn`). From that stream the tracker keeps:
//!
//! - a run of consecutive closed-eye reports; a run longer than
//!   [`EYES_CLOSED_RUN_THRESHOLD`] counts as a drowsiness event per report
//! - a tiredness counter that decides when a fresh quote is due
//! - timestamps of drowsiness events, which drive the break suggestion

use chrono::{DateTime, Duration, Utc};

use crate::types::AttentionSignal;

/// Consecutive closed-eye reports tolerated before each further report is
/// recorded as a drowsiness event.
pub const EYES_CLOSED_RUN_THRESHOLD: u32 = 3;

/// Minimum time between two quotes.
pub const QUOTE_INTERVAL_SECS: i64 = 10;

/// Window in which drowsiness events count towards a suggestion.
pub const RECENT_WINDOW_SECS: i64 = 300;

/// Time after the latest event at which a long-study reminder is shown.
pub const LONG_STUDY_SECS: i64 = 1500;

pub const HIGH_DROWSINESS: &str = "High drowsiness detected. Consider taking a break now!";
pub const SIGNS_OF_TIREDNESS: &str =
    "You're showing signs of tiredness. A break might be helpful soon.";
pub const LONG_STUDY: &str = "You've been studying for a while. Consider a short break soon.";

/// Monitoring flag plus everything derived from attention reports.
#[derive(Debug, Clone)]
pub struct AttentionTracker {
    monitoring: bool,
    eyes_closed_run: u32,
    tiredness: u32,
    threshold: u32,
    events: Vec<DateTime<Utc>>,
    last_quote_at: Option<DateTime<Utc>>,
    quote: Option<&'static str>,
}

impl AttentionTracker {
    /// Creates a tracker that asks for a quote once more than `threshold`
    /// tiredness reports have accumulated.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            monitoring: false,
            eyes_closed_run: 0,
            tiredness: 0,
            threshold,
            events: Vec::new(),
            last_quote_at: None,
            quote: None,
        }
    }

    pub fn start(&mut self) {
        self.monitoring = true;
        self.eyes_closed_run = 0;
    }

    pub fn stop(&mut self) {
        self.monitoring = false;
        self.eyes_closed_run = 0;
    }

    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Records one observation taken at `now`.
    ///
    /// Returns `true` when a new quote is due; the caller picks one and
    /// hands it back through [`set_quote`](Self::set_quote).
    pub fn observe(&mut self, signal: AttentionSignal, now: DateTime<Utc>) -> bool {
        match signal {
            AttentionSignal::EyesClosed => {
                self.eyes_closed_run += 1;
                self.tiredness += 1;
                if self.eyes_closed_run > EYES_CLOSED_RUN_THRESHOLD {
                    self.events.push(now);
                }
            }
            AttentionSignal::EyesOpen => self.eyes_closed_run = 0,
            AttentionSignal::Yawn => {
                self.tiredness += 1;
                self.events.push(now);
            }
        }

        self.tiredness > self.threshold && self.quote_interval_elapsed(now)
    }

    fn quote_interval_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.last_quote_at {
            Some(at) => now - at > Duration::seconds(QUOTE_INTERVAL_SECS),
            None => true,
        }
    }

    /// Stores the current quote and resets the tiredness counter.
    pub fn set_quote(&mut self, quote: &'static str, now: DateTime<Utc>) {
        self.quote = Some(quote);
        self.last_quote_at = Some(now);
        self.tiredness = 0;
    }

    #[must_use]
    pub fn quote(&self) -> Option<&'static str> {
        self.quote
    }

    #[must_use]
    pub fn tiredness(&self) -> u32 {
        self.tiredness
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Break suggestion for `now`, if any.
    ///
    /// Events older than the recent window are dropped, except the latest
    /// one which the long-study reminder is measured from.
    pub fn break_suggestion(&mut self, now: DateTime<Utc>) -> Option<&'static str> {
        let window = Duration::seconds(RECENT_WINDOW_SECS);
        let latest = *self.events.last()?;

        self.events.retain(|at| now - *at <= window || *at == latest);
        let recent = self
            .events
            .iter()
            .filter(|at| now - **at <= window)
            .count();

        if recent >= 3 {
            Some(HIGH_DROWSINESS)
        } else if recent >= 2 {
            Some(SIGNS_OF_TIREDNESS)
        } else if now - latest > Duration::seconds(LONG_STUDY_SECS) {
            Some(LONG_STUDY)
        } else {
            None
        }
    }
}
