//! Application state and the event handler.
//!
//! [`AppState::handle`] is the only place client state changes. It never
//! performs I/O: it returns the [`Effect`]s the runtime must carry out.
//! Stale network responses are recognised here (by epoch, sequence number
//! or status token) and dropped.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::controller::{SessionController, StopOutcome};
use crate::events::{Effect, Event, Response};
use crate::session::{Durations, Phase, Session, Transition};
use crate::tasks::{self, TaskStore};
use crate::types::ResponseStatus;

/// How long a transient notice stays on the status line.
pub const STATUS_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Status shown when monitoring could not be started.
pub const CAMERA_ERROR: &str = "Error starting camera. Please try again.";

/// The single user-visible status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Starting,
    Working,
    OnBreak,
    Stopped,
    /// Transient message, reverted to the ambient label after a few seconds.
    Notice(String),
    /// Persistent error, replaced by the next phase change or start.
    Error(String),
}

impl Status {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ready => "Ready to study",
            Self::Starting => "Starting camera...",
            Self::Working => "Working Session",
            Self::OnBreak => "Break Time!",
            Self::Stopped => "Session stopped",
            Self::Notice(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Everything the view renders.
#[derive(Debug)]
pub struct AppState {
    controller: SessionController,
    tasks: TaskStore,
    quote: Option<String>,
    break_suggestion: Option<String>,
    status: Status,
    status_token: u64,
    /// Status a pending notice reverts to.
    revert_to: Option<Status>,
}

impl AppState {
    #[must_use]
    pub fn new(durations: Durations) -> Self {
        Self {
            controller: SessionController::new(durations),
            tasks: TaskStore::new(),
            quote: None,
            break_suggestion: None,
            status: Status::Ready,
            status_token: 0,
            revert_to: None,
        }
    }

    /// Effects to run once at startup.
    pub fn boot(&mut self) -> Vec<Effect> {
        vec![Effect::LoadTasks {
            seq: self.tasks.begin_refresh(),
        }]
    }

    /// Applies one event and returns the effects it requires.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Tick => self.on_tick(),
            Event::UserStart => self.on_start(),
            Event::UserStop => self.on_stop(),
            Event::UserAddTask { name, task_type } => match tasks::validate_task_name(&name) {
                Ok(name) => vec![Effect::CreateTask { name, task_type }],
                Err(e) => {
                    debug!(error = %e, "Task input rejected");
                    Vec::new()
                }
            },
            Event::UserSetCompleted { name, completed } => {
                let request =
                    tasks::update_request(&name, completed, self.controller.session_index());
                vec![Effect::UpdateTask {
                    name: request.task,
                    completed: request.completed,
                    session: request.session,
                }]
            }
            Event::UserRefresh => vec![self.load_tasks()],
            Event::Response(response) => self.on_response(response),
            Event::StatusExpired { token } => {
                if token == self.status_token && matches!(self.status, Status::Notice(_)) {
                    self.status = match self.revert_to.take() {
                        Some(status @ (Status::Error(_) | Status::Stopped)) => status,
                        _ => self.ambient_status(),
                    };
                } else {
                    debug!(token, current = self.status_token, "Superseded status reset");
                }
                Vec::new()
            }
        }
    }

    fn on_tick(&mut self) -> Vec<Effect> {
        match self.controller.tick() {
            Some(Transition::BreakStarted) => self.set_status(Status::OnBreak),
            Some(Transition::WorkResumed { .. }) => self.set_status(Status::Working),
            None => {}
        }
        Vec::new()
    }

    fn on_start(&mut self) -> Vec<Effect> {
        match self.controller.request_start() {
            Some(epoch) => {
                self.set_status(Status::Starting);
                vec![Effect::StartMonitoring { epoch }]
            }
            None => Vec::new(),
        }
    }

    fn on_stop(&mut self) -> Vec<Effect> {
        match self.controller.stop() {
            StopOutcome::Ignored => Vec::new(),
            StopOutcome::CancelledStart => {
                self.set_status(Status::Stopped);
                vec![Effect::StopMonitoring]
            }
            StopOutcome::Stopped => {
                self.quote = None;
                self.break_suggestion = None;
                self.set_status(Status::Stopped);
                vec![Effect::StopClock, Effect::StopPollers, Effect::StopMonitoring]
            }
        }
    }

    fn on_response(&mut self, response: Response) -> Vec<Effect> {
        match response {
            Response::MonitoringStarted {
                epoch,
                result: Ok(feed),
            } => {
                if self.controller.monitoring_started(epoch, feed) {
                    self.set_status(Status::Working);
                    vec![Effect::StartClock, Effect::StartPollers { epoch }]
                } else if self.controller.is_settled_idle() {
                    warn!(epoch, "Late monitoring start after stop, stopping again");
                    vec![Effect::StopMonitoring]
                } else {
                    debug!(epoch, "Stale monitoring start ignored");
                    Vec::new()
                }
            }
            Response::MonitoringStarted {
                epoch,
                result: Err(e),
            } => {
                if self.controller.monitoring_failed(epoch) {
                    warn!(epoch, error = %e, "Failed to start monitoring");
                    self.set_status(Status::Error(CAMERA_ERROR.to_string()));
                } else {
                    debug!(epoch, error = %e, "Stale monitoring failure ignored");
                }
                Vec::new()
            }
            Response::MonitoringStopped { result } => {
                if let Err(e) = result {
                    debug!(error = %e, "Monitoring stop was not acknowledged");
                }
                Vec::new()
            }
            Response::TasksLoaded { seq, result } => {
                match result {
                    Ok(list) => {
                        if self.tasks.apply(seq, list) {
                            debug!(seq, count = self.tasks.len(), "Task list refreshed");
                        }
                    }
                    Err(e) => warn!(seq, error = %e, "Failed to load tasks"),
                }
                Vec::new()
            }
            Response::TaskCreated { name, result } => match result {
                Ok(()) => {
                    info!(task = %name, "Task added");
                    vec![Effect::ClearTaskInput, self.load_tasks()]
                }
                Err(e) => {
                    warn!(task = %name, error = %e, "Failed to add task");
                    vec![self.notice(format!("Could not add task \"{name}\""))]
                }
            },
            Response::TaskUpdated { name, result } => {
                let mut effects = Vec::new();
                match result {
                    Ok(update) if update.status == ResponseStatus::Success => {
                        if let Some(session) = update.completed_in_session {
                            effects.push(self.notice(tasks::completion_notice(&name, session)));
                        }
                    }
                    Ok(_) => {
                        warn!(task = %name, "Task update reported an error");
                        effects.push(self.notice(format!("Could not update task \"{name}\"")));
                    }
                    Err(e) => {
                        warn!(task = %name, error = %e, "Failed to update task");
                        effects.push(self.notice(format!("Could not update task \"{name}\"")));
                    }
                }
                effects.push(self.load_tasks());
                effects
            }
            Response::Quote { epoch, text } => {
                if self.is_current(epoch) {
                    self.quote = text;
                }
                Vec::new()
            }
            Response::BreakSuggestion { epoch, text } => {
                if self.is_current(epoch) {
                    self.break_suggestion = text;
                }
                Vec::new()
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        let current = epoch == self.controller.epoch() && self.controller.phase().is_active();
        if !current {
            debug!(epoch, current = self.controller.epoch(), "Stale poll result ignored");
        }
        current
    }

    fn load_tasks(&mut self) -> Effect {
        Effect::LoadTasks {
            seq: self.tasks.begin_refresh(),
        }
    }

    /// Replaces the status line, superseding any pending revert.
    fn set_status(&mut self, status: Status) {
        self.status_token += 1;
        self.status = status;
        self.revert_to = None;
    }

    /// Shows a transient notice. Errors and "stopped" survive it; phase
    /// labels are recomputed when it expires.
    fn notice(&mut self, text: String) -> Effect {
        let underlying = match &self.status {
            Status::Notice(_) => self.revert_to.take(),
            other => Some(other.clone()),
        };
        self.set_status(Status::Notice(text));
        self.revert_to = underlying;
        Effect::ScheduleStatusReset {
            token: self.status_token,
            after: STATUS_NOTICE_DURATION,
        }
    }

    fn ambient_status(&self) -> Status {
        if self.controller.is_starting() {
            return Status::Starting;
        }
        match self.controller.phase() {
            Phase::Idle => Status::Ready,
            Phase::Working => Status::Working,
            Phase::OnBreak => Status::OnBreak,
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.controller.session()
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    #[must_use]
    pub fn quote(&self) -> Option<&str> {
        self.quote.as_deref()
    }

    #[must_use]
    pub fn break_suggestion(&self) -> Option<&str> {
        self.break_suggestion.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// URL of the attached video feed, if monitoring is active.
    #[must_use]
    pub fn feed_url(&self) -> Option<&str> {
        self.controller.monitoring().feed().map(|f| f.url.as_str())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
