//! The closed set of events the client reacts to, and the effects it asks
//! the runtime to perform.
//!
//! Everything that can change client state arrives as an [`Event`]: clock
//! ticks, user intents, network responses and status timers. Handling an
//! event is a pure state transition that yields a list of [`Effect`]s; only
//! the runtime touches the network or the scheduler.

use std::time::Duration;

use crate::api::ApiError;
use crate::monitoring::VideoFeed;
use crate::types::{TaskList, TaskType, UpdateTaskResponse};

/// Input to the dispatch loop.
#[derive(Debug)]
pub enum Event {
    /// One second of the clock elapsed.
    Tick,

    /// User asked to start studying.
    UserStart,

    /// User asked to stop studying.
    UserStop,

    /// User submitted a new task.
    UserAddTask { name: String, task_type: TaskType },

    /// User toggled a task's completion checkbox.
    UserSetCompleted { name: String, completed: bool },

    /// User asked to reload the task list.
    UserRefresh,

    /// A network request finished.
    Response(Response),

    /// A transient status message reached its deadline.
    StatusExpired { token: u64 },
}

impl Event {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::UserStart => "user_start",
            Self::UserStop => "user_stop",
            Self::UserAddTask { .. } => "user_add_task",
            Self::UserSetCompleted { .. } => "user_set_completed",
            Self::UserRefresh => "user_refresh",
            Self::Response(response) => response.name(),
            Self::StatusExpired { .. } => "status_expired",
        }
    }
}

/// Result of a request issued by the runtime.
///
/// Session-scoped responses carry the epoch that issued them so late
/// arrivals can be recognised and dropped.
#[derive(Debug)]
pub enum Response {
    MonitoringStarted {
        epoch: u64,
        result: Result<VideoFeed, ApiError>,
    },
    MonitoringStopped {
        result: Result<(), ApiError>,
    },
    TasksLoaded {
        seq: u64,
        result: Result<TaskList, ApiError>,
    },
    TaskCreated {
        name: String,
        result: Result<(), ApiError>,
    },
    TaskUpdated {
        name: String,
        result: Result<UpdateTaskResponse, ApiError>,
    },
    Quote {
        epoch: u64,
        text: Option<String>,
    },
    BreakSuggestion {
        epoch: u64,
        text: Option<String>,
    },
}

impl Response {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MonitoringStarted { .. } => "monitoring_started",
            Self::MonitoringStopped { .. } => "monitoring_stopped",
            Self::TasksLoaded { .. } => "tasks_loaded",
            Self::TaskCreated { .. } => "task_created",
            Self::TaskUpdated { .. } => "task_updated",
            Self::Quote { .. } => "quote",
            Self::BreakSuggestion { .. } => "break_suggestion",
        }
    }
}

/// Work the runtime performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartMonitoring { epoch: u64 },
    StopMonitoring,
    StartClock,
    StopClock,
    StartPollers { epoch: u64 },
    StopPollers,
    LoadTasks { seq: u64 },
    CreateTask { name: String, task_type: TaskType },
    UpdateTask {
        name: String,
        completed: bool,
        session: Option<u32>,
    },
    ScheduleStatusReset { token: u64, after: Duration },
    ClearTaskInput,
}
