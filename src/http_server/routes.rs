//! Outpass Routes
//!
//! Form submission, status listing, and the warden's approve/reject links.
//! Workflow calls block on file, SMTP, and AI provider I/O, so every one
//! runs on the blocking thread pool.

use std::sync::Arc;

use std::fmt::Display;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::pages::{render_home, render_status};
use crate::observability::{Event, Logger};
use crate::store::{Decision, RequestIndex};
use crate::workflow::{OutpassWorkflow, SubmissionForm, WorkflowError, WorkflowResult};

/// Shared state for outpass routes
#[derive(Clone)]
pub struct OutpassState {
    workflow: Arc<OutpassWorkflow>,
}

impl OutpassState {
    pub fn new(workflow: Arc<OutpassWorkflow>) -> Self {
        Self { workflow }
    }

    async fn run<T, F>(&self, op: F) -> WorkflowResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&OutpassWorkflow) -> WorkflowResult<T> + Send + 'static,
    {
        let workflow = self.workflow.clone();
        tokio::task::spawn_blocking(move || op(&workflow))
            .await
            .map_err(|e| WorkflowError::TaskFailed(e.to_string()))?
    }
}

/// Plain-text failure shown to whoever triggered the request
fn error_response(err: &impl Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("An error occurred: {}", err),
    )
        .into_response()
}

fn redirect_to_status() -> Response {
    Redirect::to("/status").into_response()
}

/// Index taken from an action link path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexSegment {
    Index(RequestIndex),
    /// All digits, but larger than any possible position
    Overflow,
    Malformed,
}

fn parse_index_segment(raw: &str) -> IndexSegment {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return IndexSegment::Malformed;
    }
    match raw.parse::<RequestIndex>() {
        Ok(index) => IndexSegment::Index(index),
        Err(_) => IndexSegment::Overflow,
    }
}

/// Decode a urlencoded body regardless of its declared content type.
///
/// Repeated keys keep their first value and unknown keys are ignored.
fn decode_submission(body: &[u8]) -> Result<SubmissionForm, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
    Ok(SubmissionForm::from_pairs(pairs))
}

// ==================
// Route Handlers
// ==================

/// GET / - Submission form
async fn home() -> Html<String> {
    Html(render_home())
}

/// POST /submit_form - Create a Pending request and notify the warden
async fn submit_form(State(state): State<OutpassState>, body: Bytes) -> Response {
    let form = match decode_submission(&body) {
        Ok(form) => form,
        Err(e) => {
            let error = e.to_string();
            Logger::error(Event::SubmitFailed, &[("error", error.as_str())]);
            return error_response(&e);
        }
    };

    match state.run(move |wf| wf.submit(form)).await {
        Ok(_) => redirect_to_status(),
        Err(e) => {
            let error = e.to_string();
            Logger::error(Event::SubmitFailed, &[("error", error.as_str())]);
            error_response(&e)
        }
    }
}

/// GET /status - List every request
async fn status(State(state): State<OutpassState>) -> Response {
    match state.run(|wf| wf.list_all()).await {
        Ok(requests) => Html(render_status(&requests)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn decide(state: OutpassState, raw_index: &str, decision: Decision) -> Response {
    let index = match parse_index_segment(raw_index) {
        IndexSegment::Index(index) => index,
        // No record can live at this position
        IndexSegment::Overflow => {
            Logger::info(
                Event::DecisionIgnored,
                &[("index", raw_index), ("reason", "out_of_range")],
            );
            return redirect_to_status();
        }
        IndexSegment::Malformed => return StatusCode::NOT_FOUND.into_response(),
    };

    match state.run(move |wf| wf.decide(index, decision)).await {
        Ok(_) => redirect_to_status(),
        Err(e) => error_response(&e),
    }
}

/// GET /approve/:index
async fn approve(State(state): State<OutpassState>, Path(index): Path<String>) -> Response {
    decide(state, &index, Decision::Approve).await
}

/// GET /reject/:index
async fn reject(State(state): State<OutpassState>, Path(index): Path<String>) -> Response {
    decide(state, &index, Decision::Reject).await
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ==================
// Router
// ==================

/// Create outpass routes
pub fn outpass_routes(workflow: Arc<OutpassWorkflow>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/submit_form", post(submit_form))
        .route("/status", get(status))
        .route("/approve/:index", get(approve))
        .route("/reject/:index", get(reject))
        .route("/health", get(health))
        .with_state(OutpassState::new(workflow))
}
