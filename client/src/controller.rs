//! Session state machine.
//!
//! ```text
//!            start (monitoring ok)
//!   Idle ──────────────────────────► Working ◄──┐
//!    ▲                                  │       │ expiry
//!    │ stop                      expiry │       │ (index += 1)
//!    │                                  ▼       │
//!    └────────────────────────────── OnBreak ───┘
//! ```
//!
//! A start is two-step: [`SessionController::request_start`] opens a pending
//! start tagged with a fresh epoch, and only a successful monitoring response
//! for that same epoch moves the phase out of Idle. Every stop bumps the
//! epoch, so responses issued before it can be recognised as stale.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::monitoring::{MonitoringState, VideoFeed};
use crate::session::{Durations, Phase, Session, Transition};

/// What a stop request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Already idle with nothing pending.
    Ignored,
    /// A start was in flight and has been abandoned.
    CancelledStart,
    /// A running session was torn down.
    Stopped,
}

/// Owns the session phase, the countdown and the monitoring mirror.
#[derive(Debug, Clone)]
pub struct SessionController {
    phase: Phase,
    session_index: u32,
    clock: Clock,
    durations: Durations,
    epoch: u64,
    pending_start: Option<u64>,
    monitoring: MonitoringState,
}

impl SessionController {
    #[must_use]
    pub fn new(durations: Durations) -> Self {
        Self {
            phase: Phase::Idle,
            session_index: 1,
            clock: Clock::new(durations.work_secs),
            durations,
            epoch: 0,
            pending_start: None,
            monitoring: MonitoringState::default(),
        }
    }

    /// Opens a pending start and returns its epoch.
    ///
    /// Returns `None` when a session is running or a start is already in
    /// flight.
    pub fn request_start(&mut self) -> Option<u64> {
        if self.phase.is_active() || self.pending_start.is_some() {
            debug!(phase = %self.phase, pending = ?self.pending_start, "Start ignored");
            return None;
        }
        self.epoch += 1;
        self.pending_start = Some(self.epoch);
        debug!(epoch = self.epoch, "Start requested");
        Some(self.epoch)
    }

    /// Completes the pending start for `epoch` and enters Working.
    ///
    /// Returns `false` if `epoch` is not the pending start (stale response).
    pub fn monitoring_started(&mut self, epoch: u64, feed: VideoFeed) -> bool {
        if self.pending_start != Some(epoch) {
            return false;
        }
        self.pending_start = None;
        self.phase = Phase::Working;
        self.session_index = 1;
        self.clock.start(self.durations.work_secs);
        self.monitoring.attach(feed);
        info!(epoch, "Session started");
        true
    }

    /// Abandons the pending start for `epoch` after a monitoring failure.
    ///
    /// Returns `false` if `epoch` is not the pending start.
    pub fn monitoring_failed(&mut self, epoch: u64) -> bool {
        if self.pending_start != Some(epoch) {
            return false;
        }
        self.pending_start = None;
        true
    }

    /// Advances the clock by one second, switching phase on expiry.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.phase.is_active() || !self.clock.tick() {
            return None;
        }

        match self.phase {
            Phase::Working => {
                self.phase = Phase::OnBreak;
                self.clock.start(self.durations.break_secs);
                info!(session = self.session_index, "Break started");
                Some(Transition::BreakStarted)
            }
            Phase::OnBreak => {
                self.session_index += 1;
                self.phase = Phase::Working;
                self.clock.start(self.durations.work_secs);
                info!(session = self.session_index, "Work resumed");
                Some(Transition::WorkResumed {
                    session_index: self.session_index,
                })
            }
            Phase::Idle => None,
        }
    }

    /// Stops the session or cancels a pending start.
    ///
    /// Local state is fully reset before this returns; the remote stop is the
    /// caller's business.
    pub fn stop(&mut self) -> StopOutcome {
        if let Some(epoch) = self.pending_start.take() {
            self.epoch += 1;
            info!(cancelled_epoch = epoch, "Pending start cancelled");
            return StopOutcome::CancelledStart;
        }
        if !self.phase.is_active() {
            return StopOutcome::Ignored;
        }

        self.clock.stop();
        self.clock = Clock::new(self.durations.work_secs);
        self.phase = Phase::Idle;
        self.session_index = 1;
        self.monitoring.detach();
        self.epoch += 1;
        info!("Session stopped");
        StopOutcome::Stopped
    }

    /// Current phase, round and countdown.
    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            phase: self.phase,
            session_index: self.session_index,
            remaining_seconds: self.clock.remaining_seconds(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session_index(&self) -> u32 {
        self.session_index
    }

    /// Epoch of the current (or most recent) session.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.pending_start.is_some()
    }

    /// Idle with no start in flight.
    #[must_use]
    pub fn is_settled_idle(&self) -> bool {
        !self.phase.is_active() && self.pending_start.is_none()
    }

    #[must_use]
    pub fn monitoring(&self) -> &MonitoringState {
        &self.monitoring
    }

    #[must_use]
    pub fn durations(&self) -> Durations {
        self.durations
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
