//! HTTP client for the StudyGuard service.
//!
//! This module wraps every endpoint of the study service contract:
//!
//! - `GET /tasks`, `POST /tasks`, `POST /update_task`
//! - `GET /get_quote`, `GET /get_break_suggestion`
//! - `POST /start_monitoring`, `POST /stop_monitoring`
//! - the `GET /video_feed` URL used by the monitoring feed
//!
//! Requests share one pooled `reqwest` client. There is no retry here: the
//! pollers simply try again on their next period, and primary actions report
//! failures to the user, who retries.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use studyguard_client::api::ApiClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = ApiClient::new("http://127.0.0.1:5000", Duration::from_secs(10)).unwrap();
//!     let tasks = api.list_tasks().await.unwrap();
//!     println!("{} tasks", tasks.len());
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::types::{
    BreakSuggestionResponse, CreateTaskRequest, QuoteResponse, ResponseStatus, StatusResponse,
    TaskList, TaskType, UpdateTaskRequest, UpdateTaskResponse,
};

/// Errors that can occur while talking to the study service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("{operation} rejected: {status} - {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Server answered 2xx but reported `"status": "error"`.
    #[error("{operation} failed on the server")]
    Failed { operation: &'static str },

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Typed client for the study service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Base URL the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full task list.
    pub async fn list_tasks(&self) -> Result<TaskList, ApiError> {
        let response = self.client.get(self.url("/tasks")).send().await?;
        decode(response, "list tasks").await
    }

    /// Creates (or replaces) a task.
    pub async fn create_task(&self, name: &str, task_type: TaskType) -> Result<(), ApiError> {
        let body = CreateTaskRequest {
            task: name.to_string(),
            task_type,
        };
        debug!(task = %name, task_type = %task_type, "Creating task");
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&body)
            .send()
            .await?;
        let status: StatusResponse = decode(response, "create task").await?;
        ensure_success(status.status, "create task")
    }

    /// Marks a task complete or incomplete.
    ///
    /// The caller decides the `session` value; the service records it only
    /// when `completed` is true.
    pub async fn update_task(
        &self,
        request: &UpdateTaskRequest,
    ) -> Result<UpdateTaskResponse, ApiError> {
        debug!(
            task = %request.task,
            completed = request.completed,
            session = ?request.session,
            "Updating task"
        );
        let response = self
            .client
            .post(self.url("/update_task"))
            .json(request)
            .send()
            .await?;
        decode(response, "update task").await
    }

    /// Polls the current motivational quote.
    pub async fn get_quote(&self) -> Result<QuoteResponse, ApiError> {
        let response = self.client.get(self.url("/get_quote")).send().await?;
        decode(response, "get quote").await
    }

    /// Polls the current break suggestion.
    pub async fn get_break_suggestion(&self) -> Result<BreakSuggestionResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/get_break_suggestion"))
            .send()
            .await?;
        decode(response, "get break suggestion").await
    }

    /// Asks the service to start camera monitoring.
    pub async fn start_monitoring(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/start_monitoring"))
            .send()
            .await?;
        let status: StatusResponse = decode(response, "start monitoring").await?;
        ensure_success(status.status, "start monitoring")
    }

    /// Asks the service to stop camera monitoring.
    pub async fn stop_monitoring(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/stop_monitoring"))
            .send()
            .await?;
        let status: StatusResponse = decode(response, "stop monitoring").await?;
        ensure_success(status.status, "stop monitoring")
    }

    /// URL of the video feed, with a cache-busting timestamp.
    #[must_use]
    pub fn video_feed_url(&self, timestamp_ms: i64) -> String {
        format!("{}/video_feed?ts={timestamp_ms}", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Checks the HTTP status and decodes a JSON body.
async fn decode<T: DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Rejected {
            operation,
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    trace!(operation, bytes = bytes.len(), "Decoding response");
    Ok(serde_json::from_slice(&bytes)?)
}

fn ensure_success(status: ResponseStatus, operation: &'static str) -> Result<(), ApiError> {
    match status {
        ResponseStatus::Success => Ok(()),
        ResponseStatus::Error => Err(ApiError::Failed { operation }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn video_feed_url_carries_timestamp() {
        let api = ApiClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(
            api.video_feed_url(1_700_000_000_123),
            "http://localhost:5000/video_feed?ts=1700000000123"
        );
    }

    #[tokio::test]
    async fn list_tasks_decodes_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Read Ch.1": {"type": "reading", "completed": false, "completed_in_session": null}
            })))
            .mount(&server)
            .await;

        let tasks = client_for(&server).list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(!tasks["Read Ch.1"].completed);
    }

    #[tokio::test]
    async fn create_task_posts_name_and_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(body_json(json!({"task": "Essay", "type": "writing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .create_task("Essay", TaskType::Writing)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn status_error_body_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/start_monitoring"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
            .mount(&server)
            .await;

        let err = client_for(&server).start_monitoring().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Failed {
                operation: "start monitoring"
            }
        ));
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_quote"))
            .respond_with(ResponseTemplate::new(503).set_body_string("camera busy"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_quote().await.unwrap_err();
        match err {
            ApiError::Rejected {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, "get quote");
                assert_eq!(status, 503);
                assert_eq!(message, "camera busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_break_suggestion"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_break_suggestion().await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.stop_monitoring().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
