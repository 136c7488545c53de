//! Request and response bodies for the StudyGuard HTTP API.
//!
//! Request bodies keep their fields optional so that handlers can answer a
//! missing field with the service's own `{status: "error"}` body instead of
//! a bare extractor rejection.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of study work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Reading,
    Writing,
    ProblemSolving,
    Memorization,
    Research,
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub completed: bool,
    pub completed_in_session: Option<u32>,
}

impl TaskRecord {
    /// A fresh, not yet completed task.
    #[must_use]
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            completed: false,
            completed_in_session: None,
        }
    }
}

/// `GET /tasks` body: name to record, in name order.
pub type TaskList = BTreeMap<String, TaskRecord>;

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub task: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
}

/// Body of `POST /update_task`.
///
/// `session` distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`); the latter is how a task is un-completed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub task: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub session: Option<Option<u32>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `{status}` body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    #[must_use]
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

/// Response of a successful `POST /update_task`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTaskResponse {
    pub status: &'static str,
    pub task: String,
    pub completed_in_session: Option<u32>,
}

/// Response of `GET /get_quote`.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub quote: String,
    pub has_quote: bool,
}

impl QuoteResponse {
    #[must_use]
    pub fn new(quote: Option<&str>) -> Self {
        let quote = quote.unwrap_or_default().to_string();
        Self {
            has_quote: !quote.is_empty(),
            quote,
        }
    }
}

/// Response of `GET /get_break_suggestion`.
#[derive(Debug, Clone, Serialize)]
pub struct BreakSuggestionResponse {
    pub suggestion: Option<&'static str>,
    pub has_suggestion: bool,
}

impl BreakSuggestionResponse {
    #[must_use]
    pub fn new(suggestion: Option<&'static str>) -> Self {
        Self {
            has_suggestion: suggestion.is_some(),
            suggestion,
        }
    }
}

/// A single observation reported by the capture process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionSignal {
    EyesClosed,
    EyesOpen,
    Yawn,
}

/// Body of `POST /attention`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttentionRequest {
    pub signal: AttentionSignal,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
}
