//! StudyGuard client - Pomodoro study-session timer.
//!
//! The client drives a work/break cycle, keeps a task list stored on the
//! StudyGuard service, and polls the service for motivational quotes and
//! break suggestions while a session runs. A session can only start once
//! the service's camera monitoring has started.
//!
//! # Architecture
//!
//! All state lives in one [`AppState`] value that reacts to a closed set of
//! [`Event`]s and answers with [`Effect`]s. The [`Runtime`] feeds it events
//! one at a time and performs the effects (HTTP requests, schedules), so
//! stale responses and double starts are resolved in a single place.
//!
//! # Modules
//!
//! - [`api`]: HTTP client for the service contract
//! - [`clock`]: Countdown primitive
//! - [`config`]: Configuration from environment variables
//! - [`controller`]: Session state machine (Idle, Working, OnBreak)
//! - [`error`]: Error types for client operations
//! - [`events`]: Events and effects
//! - [`monitoring`]: Monitoring start/stop and the video feed
//! - [`polling`]: Quote and break-suggestion pollers
//! - [`runtime`]: Event-dispatch loop
//! - [`schedule`]: Cancelable repeating jobs
//! - [`session`]: Phases and durations
//! - [`state`]: Application state and status line
//! - [`tasks`]: Task store façade and input validation
//! - [`tui`]: Terminal user interface
//! - [`types`]: Wire types

pub mod api;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod monitoring;
pub mod polling;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod state;
pub mod tasks;
pub mod tui;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use config::{Config, ConfigError};
pub use controller::{SessionController, StopOutcome};
pub use error::{ClientError, Result, TuiError};
pub use events::{Effect, Event, Response};
pub use runtime::Runtime;
pub use session::{Durations, Phase, Session};
pub use state::{AppState, Status};
pub use tasks::{InputError, TaskStore};
pub use types::{TaskList, TaskRecord, TaskType};
