//! Wire types for the StudyGuard service contract.
//!
//! These mirror the JSON bodies exchanged with the study service. Field names
//! follow the wire format (`snake_case`), so the structs can be used directly
//! with `reqwest`'s JSON helpers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of study work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Reading,
    Writing,
    ProblemSolving,
    Memorization,
    Research,
}

impl TaskType {
    /// Every task type, in selector order.
    pub const ALL: [TaskType; 5] = [
        TaskType::Reading,
        TaskType::Writing,
        TaskType::ProblemSolving,
        TaskType::Memorization,
        TaskType::Research,
    ];

    /// Wire name (`problem_solving`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Writing => "writing",
            Self::ProblemSolving => "problem_solving",
            Self::Memorization => "memorization",
            Self::Research => "research",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Writing => "Writing",
            Self::ProblemSolving => "Problem Solving",
            Self::Memorization => "Memorization",
            Self::Research => "Research",
        }
    }

    /// The next type in selector order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown task type '{s}'"))
    }
}

/// A task as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub completed: bool,
    #[serde(default)]
    pub completed_in_session: Option<u32>,
}

impl TaskRecord {
    /// Label shown next to a finished task.
    ///
    /// Only a completed task with a recorded session has one.
    #[must_use]
    pub fn completion_label(&self) -> Option<String> {
        match (self.completed, self.completed_in_session) {
            (true, Some(session)) => Some(format!("Completed in session {session}")),
            _ => None,
        }
    }
}

/// Full task list keyed by task name.
pub type TaskList = BTreeMap<String, TaskRecord>;

/// Outcome flag carried by mutation responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    #[serde(other)]
    Error,
}

/// `{status}` body returned by create and monitoring endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ResponseStatus,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub task: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

/// Body of `POST /update_task`.
///
/// `session` is serialized as `null` when un-completing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub task: String,
    pub completed: bool,
    pub session: Option<u32>,
}

/// Response of `POST /update_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub completed_in_session: Option<u32>,
}

/// Response of `GET /get_quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub has_quote: bool,
    #[serde(default)]
    pub quote: Option<String>,
}

impl QuoteResponse {
    /// The quote to display, if the flag is set and the text is non-empty.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        presence(self.has_quote, self.quote)
    }
}

/// Response of `GET /get_break_suggestion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSuggestionResponse {
    pub has_suggestion: bool,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl BreakSuggestionResponse {
    /// The suggestion to display, if the flag is set and the text is non-empty.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        presence(self.has_suggestion, self.suggestion)
    }
}

fn presence(flag: bool, text: Option<String>) -> Option<String> {
    text.filter(|t| flag && !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_type_uses_snake_case_on_the_wire() {
        let value = serde_json::to_value(TaskType::ProblemSolving).unwrap();
        assert_eq!(value, json!("problem_solving"));

        let parsed: TaskType = serde_json::from_value(json!("memorization")).unwrap();
        assert_eq!(parsed, TaskType::Memorization);
    }

    #[test]
    fn task_type_from_str_and_cycle() {
        assert_eq!("research".parse::<TaskType>(), Ok(TaskType::Research));
        assert!("cooking".parse::<TaskType>().is_err());
        assert_eq!(TaskType::Research.next(), TaskType::Reading);
        assert_eq!(TaskType::Reading.next(), TaskType::Writing);
    }

    #[test]
    fn task_list_deserializes_from_server_mapping() {
        let body = json!({
            "Read Ch.1": {"type": "reading", "completed": false, "completed_in_session": null},
            "Essay": {"type": "writing", "completed": true, "completed_in_session": 2}
        });
        let list: TaskList = serde_json::from_value(body).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list["Essay"].completed_in_session, Some(2));
        assert_eq!(list["Read Ch.1"].task_type, TaskType::Reading);
    }

    #[test]
    fn completion_label_requires_completed_and_session() {
        let mut record = TaskRecord {
            task_type: TaskType::Writing,
            completed: true,
            completed_in_session: Some(3),
        };
        assert_eq!(
            record.completion_label().as_deref(),
            Some("Completed in session 3")
        );

        record.completed = false;
        assert_eq!(record.completion_label(), None);

        record.completed = true;
        record.completed_in_session = None;
        assert_eq!(record.completion_label(), None);
    }

    #[test]
    fn update_request_serializes_null_session() {
        let request = UpdateTaskRequest {
            task: "Essay".to_string(),
            completed: false,
            session: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"task": "Essay", "completed": false, "session": null})
        );
    }

    #[test]
    fn unknown_status_is_treated_as_error() {
        let parsed: StatusResponse = serde_json::from_value(json!({"status": "pending"})).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Error);
    }

    #[test]
    fn presence_flag_hides_empty_text() {
        let quote = QuoteResponse {
            has_quote: true,
            quote: Some("   ".to_string()),
        };
        assert_eq!(quote.into_text(), None);

        let suggestion = BreakSuggestionResponse {
            has_suggestion: false,
            suggestion: Some("Take a break".to_string()),
        };
        assert_eq!(suggestion.into_text(), None);

        let quote = QuoteResponse {
            has_quote: true,
            quote: Some("Stay focused".to_string()),
        };
        assert_eq!(quote.into_text().as_deref(), Some("Stay focused"));
    }
}
