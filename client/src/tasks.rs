//! Task store façade.
//!
//! The study service owns the task list. The client keeps a read-through
//! cache that is replaced wholesale by every list response; there is no
//! optimistic merging. List responses are numbered so a slow response can
//! never overwrite a newer one.
//!
//! Input validation happens here, before any request is built.

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::error::Result;
use crate::types::{TaskList, TaskRecord, TaskType, UpdateTaskRequest, UpdateTaskResponse};

/// Invalid user input, rejected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Task name is empty or whitespace.
    #[error("task name cannot be empty")]
    EmptyTaskName,
}

/// Trims a task name and rejects blank ones.
///
/// # Errors
///
/// Returns [`InputError::EmptyTaskName`] for empty or whitespace-only input.
pub fn validate_task_name(raw: &str) -> std::result::Result<String, InputError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(InputError::EmptyTaskName);
    }
    Ok(name.to_string())
}

/// Builds the update body: completing attaches the current session index,
/// un-completing sends no session.
#[must_use]
pub fn update_request(name: &str, completed: bool, session_index: u32) -> UpdateTaskRequest {
    UpdateTaskRequest {
        task: name.to_string(),
        completed,
        session: completed.then_some(session_index),
    }
}

/// Transient message shown after a task is completed.
#[must_use]
pub fn completion_notice(name: &str, session: u32) -> String {
    format!("Task \"{name}\" completed in session {session}!")
}

/// Client-side cache of the task list.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: TaskList,
    issued_seq: u64,
    applied_seq: u64,
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers a new list request.
    pub fn begin_refresh(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Replaces the cache with a list response.
    ///
    /// Returns `false` (and changes nothing) when a newer response was
    /// already applied.
    pub fn apply(&mut self, seq: u64, tasks: TaskList) -> bool {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "Ignoring stale task list");
            return false;
        }
        self.applied_seq = seq;
        self.tasks = tasks;
        true
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Fetches the full task list.
pub async fn list(api: &ApiClient) -> std::result::Result<TaskList, ApiError> {
    api.list_tasks().await
}

/// Validates and creates a task, returning the stored (trimmed) name.
///
/// # Errors
///
/// Returns an input error for a blank name (no request is sent), or the
/// service error if the create fails.
pub async fn create(api: &ApiClient, raw_name: &str, task_type: TaskType) -> Result<String> {
    let name = validate_task_name(raw_name)?;
    api.create_task(&name, task_type).await?;
    Ok(name)
}

/// Marks a task complete in `session_index`, or incomplete.
pub async fn set_completed(
    api: &ApiClient,
    name: &str,
    completed: bool,
    session_index: u32,
) -> std::result::Result<UpdateTaskResponse, ApiError> {
    api.update_task(&update_request(name, completed, session_index))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(completed: bool, session: Option<u32>) -> TaskRecord {
        TaskRecord {
            task_type: TaskType::Reading,
            completed,
            completed_in_session: session,
        }
    }

    #[test]
    fn validate_trims_and_rejects_blank() {
        assert_eq!(validate_task_name("  Read Ch.1 "), Ok("Read Ch.1".to_string()));
        assert_eq!(validate_task_name(""), Err(InputError::EmptyTaskName));
        assert_eq!(validate_task_name(" \t\n"), Err(InputError::EmptyTaskName));
    }

    #[test]
    fn update_request_attaches_session_only_when_completing() {
        let done = update_request("Essay", true, 2);
        assert_eq!(done.session, Some(2));

        let undone = update_request("Essay", false, 2);
        assert_eq!(undone.session, None);
        assert!(!undone.completed);
    }

    #[test]
    fn completion_notice_text() {
        assert_eq!(
            completion_notice("Read Ch.1", 2),
            "Task \"Read Ch.1\" completed in session 2!"
        );
    }

    #[test]
    fn newer_list_wins_over_late_response() {
        let mut store = TaskStore::new();
        let first = store.begin_refresh();
        let second = store.begin_refresh();

        let mut newer = TaskList::new();
        newer.insert("A".to_string(), record(true, Some(1)));
        assert!(store.apply(second, newer));

        let mut older = TaskList::new();
        older.insert("A".to_string(), record(false, None));
        assert!(!store.apply(first, older));

        assert_eq!(store.len(), 1);
        assert!(store.get("A").unwrap().completed);
    }

    #[test]
    fn apply_replaces_wholesale() {
        let mut store = TaskStore::new();
        let mut list = TaskList::new();
        list.insert("A".to_string(), record(false, None));
        list.insert("B".to_string(), record(false, None));
        let seq = store.begin_refresh();
        store.apply(seq, list);

        let mut list = TaskList::new();
        list.insert("B".to_string(), record(false, None));
        let seq = store.begin_refresh();
        store.apply(seq, list);

        assert!(store.get("A").is_none());
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = create(&api, "   ", TaskType::Reading).await.unwrap_err();
        assert!(matches!(err, ClientError::Input(InputError::EmptyTaskName)));
    }

    #[tokio::test]
    async fn create_reports_service_failure_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = create(&api, "Essay", TaskType::Writing).await.unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));
    }

    #[tokio::test]
    async fn set_completed_sends_null_session_when_unchecking() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update_task"))
            .and(body_json(
                json!({"task": "Essay", "completed": false, "session": null}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": "success", "task": "Essay", "completed_in_session": null}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let response = set_completed(&api, "Essay", false, 3).await.unwrap();
        assert_eq!(response.completed_in_session, None);
    }
}
