//! HTTP route handlers for the StudyGuard server.
//!
//! This module provides the HTTP API endpoints:
//!
//! - `GET /tasks` - List tasks
//! - `POST /tasks` - Create (or replace) a task
//! - `POST /update_task` - Mark a task complete or incomplete
//! - `GET /get_quote` - Current motivational quote
//! - `GET /get_break_suggestion` - Break suggestion from recent drowsiness
//! - `POST /start_monitoring` / `POST /stop_monitoring` - Monitoring flag
//! - `POST /attention` - Attention observation from the capture process
//! - `GET /health` - Health check endpoint
//!
//! # Example
//!
//! ```rust,no_run
//! use studyguard_server::config::Config;
//! use studyguard_server::routes::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("failed to load config");
//!     let state = AppState::new(config);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     serve(listener, state, std::future::pending()).await.unwrap();
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::attention::AttentionTracker;
use crate::board::TaskBoard;
use crate::config::Config;
use crate::error::ApiError;
use crate::quotes;
use crate::types::{
    AttentionRequest, BreakSuggestionResponse, CreateTaskRequest, HealthResponse, QuoteResponse,
    StatusResponse, TaskList, UpdateTaskRequest, UpdateTaskResponse,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all route handlers.
///
/// Cloned for each request; the board and tracker sit behind shared locks.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,

    /// Task board.
    pub board: Arc<RwLock<TaskBoard>>,

    /// Monitoring flag and attention-derived state.
    pub attention: Arc<Mutex<AttentionTracker>>,

    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let attention = AttentionTracker::new(config.tiredness_threshold);
        Self {
            config: Arc::new(config),
            board: Arc::new(RwLock::new(TaskBoard::new())),
            attention: Arc::new(Mutex::new(attention)),
            start_time: Instant::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Creates the application router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks).post(post_task))
        .route("/update_task", post(post_update_task))
        .route("/get_quote", get(get_quote))
        .route("/get_break_suggestion", get(get_break_suggestion))
        .route("/start_monitoring", post(post_start_monitoring))
        .route("/stop_monitoring", post(post_stop_monitoring))
        .route("/attention", post(post_attention))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::validation(rejection.body_text())
    })
}

// ============================================================================
// Tasks
// ============================================================================

async fn get_tasks(State(state): State<AppState>) -> Json<TaskList> {
    Json(state.board.read().await.tasks().clone())
}

/// `POST /tasks`: `{task, type}`.
///
/// A task with the same name is replaced.
async fn post_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = parse_body(body)?;

    let name = request
        .task
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::validation("task name is required"))?;
    let task_type = request
        .task_type
        .ok_or_else(|| ApiError::validation("task type is required"))?;

    state.board.write().await.create(name.clone(), task_type);
    info!(task = %name, task_type = ?task_type, "Task created");

    Ok(Json(StatusResponse::success()))
}

/// `POST /update_task`: `{task, completed, session}`.
///
/// `session` must be present; it may be `null`. Un-completing always clears
/// the stored session.
async fn post_update_task(
    State(state): State<AppState>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<UpdateTaskResponse>, ApiError> {
    let request = parse_body(body)?;

    let (Some(name), Some(completed), Some(session)) =
        (request.task, request.completed, request.session)
    else {
        return Err(ApiError::validation(
            "task, completed and session are required",
        ));
    };

    let mut board = state.board.write().await;
    let record = board
        .update(&name, completed, session)
        .ok_or_else(|| ApiError::UnknownTask(name.clone()))?;
    let completed_in_session = record.completed_in_session;
    drop(board);

    info!(task = %name, completed, session = ?completed_in_session, "Task updated");
    Ok(Json(UpdateTaskResponse {
        status: "success",
        task: name,
        completed_in_session,
    }))
}

// ============================================================================
// Quotes and suggestions
// ============================================================================

async fn get_quote(State(state): State<AppState>) -> Json<QuoteResponse> {
    let attention = state.attention.lock().await;
    Json(QuoteResponse::new(attention.quote()))
}

async fn get_break_suggestion(State(state): State<AppState>) -> Json<BreakSuggestionResponse> {
    let suggestion = state.attention.lock().await.break_suggestion(Utc::now());
    Json(BreakSuggestionResponse::new(suggestion))
}

// ============================================================================
// Monitoring
// ============================================================================

async fn post_start_monitoring(State(state): State<AppState>) -> Json<StatusResponse> {
    state.attention.lock().await.start();
    info!("Monitoring started");
    Json(StatusResponse::success())
}

async fn post_stop_monitoring(State(state): State<AppState>) -> Json<StatusResponse> {
    state.attention.lock().await.stop();
    info!("Monitoring stopped");
    Json(StatusResponse::success())
}

/// `POST /attention`: `{signal}`. Only accepted while monitoring.
async fn post_attention(
    State(state): State<AppState>,
    body: Result<Json<AttentionRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = parse_body(body)?;
    let now = Utc::now();

    let mut attention = state.attention.lock().await;
    if !attention.is_monitoring() {
        return Err(ApiError::MonitoringInactive);
    }

    if attention.observe(request.signal, now) {
        let task_type = state.board.read().await.first_incomplete_type();
        let quote = quotes::pick(task_type);
        attention.set_quote(quote, now);
        info!(task_type = ?task_type, "New quote selected");
    }

    Ok(Json(StatusResponse::success()))
}

// ============================================================================
// Health
// ============================================================================

/// Health check endpoint.
///
/// ```json
/// { "status": "ok", "uptime_seconds": 3600 }
/// ```
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::attention::HIGH_DROWSINESS;
    use crate::types::TaskType;

    fn test_state() -> AppState {
        AppState::new(Config {
            port: 0,
            tiredness_threshold: 2,
        })
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    // ========================================================================
    // Health
    // ========================================================================

    #[tokio::test]
    async fn health_returns_ok_status() {
        let (status, body) = send(&test_state(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);

        let health: HealthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(health.status, "ok");
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    #[tokio::test]
    async fn create_then_list_tasks() {
        let state = test_state();

        let (status, body) = send(
            &state,
            post_json("/tasks", json!({"task": "Read Ch.1", "type": "reading"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let (status, body) = send(&state, get("/tasks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "Read Ch.1": {"type": "reading", "completed": false, "completed_in_session": null}
            })
        );
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_and_blank_names() {
        let state = test_state();

        for request in [
            json!({"type": "reading"}),
            json!({"task": "Essay"}),
            json!({"task": "   ", "type": "writing"}),
            json!({"task": "Bake", "type": "cooking"}),
        ] {
            let (status, body) = send(&state, post_json("/tasks", request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["status"], "error");
        }

        assert!(state.board.read().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/tasks")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&test_state(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn update_task_records_and_clears_session() {
        let state = test_state();
        state.board.write().await.create("Essay", TaskType::Writing);

        let (status, body) = send(
            &state,
            post_json(
                "/update_task",
                json!({"task": "Essay", "completed": true, "session": 2}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "success", "task": "Essay", "completed_in_session": 2})
        );

        let (_, body) = send(
            &state,
            post_json(
                "/update_task",
                json!({"task": "Essay", "completed": false, "session": null}),
            ),
        )
        .await;
        assert_eq!(body["completed_in_session"], Value::Null);

        let (_, tasks) = send(&state, get("/tasks")).await;
        assert_eq!(tasks["Essay"]["completed"], false);
    }

    #[tokio::test]
    async fn update_unknown_task_is_not_found() {
        let (status, body) = send(
            &test_state(),
            post_json(
                "/update_task",
                json!({"task": "Nope", "completed": true, "session": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn update_requires_session_field() {
        let state = test_state();
        state.board.write().await.create("Essay", TaskType::Writing);

        let (status, _) = send(
            &state,
            post_json("/update_task", json!({"task": "Essay", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!state.board.read().await.tasks()["Essay"].completed);
    }

    // ========================================================================
    // Monitoring, quotes and suggestions
    // ========================================================================

    #[tokio::test]
    async fn quote_and_suggestion_start_empty() {
        let state = test_state();

        let (_, quote) = send(&state, get("/get_quote")).await;
        assert_eq!(quote, json!({"quote": "", "has_quote": false}));

        let (_, suggestion) = send(&state, get("/get_break_suggestion")).await;
        assert_eq!(
            suggestion,
            json!({"suggestion": null, "has_suggestion": false})
        );
    }

    #[tokio::test]
    async fn attention_requires_monitoring() {
        let state = test_state();

        let (status, body) =
            send(&state, post_json("/attention", json!({"signal": "yawn"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");

        let (status, _) = send(&state, post_empty("/start_monitoring")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, post_json("/attention", json!({"signal": "yawn"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&state, post_empty("/stop_monitoring")).await;
        assert_eq!(body, json!({"status": "success"}));
        let (status, _) = send(&state, post_json("/attention", json!({"signal": "yawn"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn tiredness_produces_task_quote_and_suggestion() {
        let state = test_state();
        state.board.write().await.create("Algebra", TaskType::ProblemSolving);
        send(&state, post_empty("/start_monitoring")).await;

        for _ in 0..3 {
            let (status, _) =
                send(&state, post_json("/attention", json!({"signal": "yawn"}))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, quote) = send(&state, get("/get_quote")).await;
        assert_eq!(quote["has_quote"], true);
        let text = quote["quote"].as_str().unwrap();
        assert!(quotes::for_task_type(TaskType::ProblemSolving).contains(&text));

        let (_, suggestion) = send(&state, get("/get_break_suggestion")).await;
        assert_eq!(
            suggestion,
            json!({"suggestion": HIGH_DROWSINESS, "has_suggestion": true})
        );
    }
}
