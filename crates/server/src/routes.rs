//! HTTP transport for the slot-filling agent.
//!
//! Endpoints:
//! - `POST /chat`        — one conversational turn of field collection
//! - `POST /music`       — the music selection sub-flow
//! - `POST /submit`      — gate the state and drive the submission service
//! - `POST /reset`       — clear a session between conversations
//! - `POST /oauth/token` — simulated authorization-code exchange
//! - `GET  /health`      — readiness probe
//!
//! All rejection bodies share the uniform failure shape (`error`,
//! `explanation`, `suggested_action`, `retry_allowed`); the aggregate gate
//! rejection additionally lists every violated field.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use adpilot_agent::runtime::{AgentRuntime, ChatReply, MusicReply, SubmitRejection};
use adpilot_agent::sessions::DEFAULT_SESSION;
use adpilot_core::domain::session::StateSnapshot;
use adpilot_core::gate::{FieldViolation, SubmissionBlocked};
use adpilot_core::outcome::ValidationFailure;
use adpilot_gateway::oauth::{exchange_code_for_token, TokenGrant};
use adpilot_gateway::submission::SubmissionReceipt;

use crate::health::health;

#[derive(Clone)]
pub struct AppState {
    runtime: Arc<AgentRuntime>,
}

impl AppState {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime: Arc::new(runtime) }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct MusicRequest {
    pub session_id: Option<String>,
    pub choice: String,
    pub music_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub conversation_state: StateSnapshot,
}

#[derive(Debug, Serialize)]
struct MissingFieldsBody {
    error: &'static str,
    missing_fields: Vec<FieldViolation>,
}

pub enum ApiError {
    Validation(ValidationFailure),
    Submit(SubmitRejection),
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl From<SubmitRejection> for ApiError {
    fn from(rejection: SubmitRejection) -> Self {
        Self::Submit(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(failure) => {
                (StatusCode::BAD_REQUEST, Json(failure)).into_response()
            }
            Self::Submit(SubmitRejection::Blocked(SubmissionBlocked::MissingFields {
                violations,
            })) => (
                StatusCode::BAD_REQUEST,
                Json(MissingFieldsBody {
                    error: "missing_required_fields",
                    missing_fields: violations,
                }),
            )
                .into_response(),
            Self::Submit(SubmitRejection::Blocked(SubmissionBlocked::RuleViolation(failure)))
            | Self::Submit(SubmitRejection::Platform(failure)) => {
                (StatusCode::BAD_REQUEST, Json(failure)).into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/music", post(music))
        .route("/submit", post(submit))
        .route("/reset", post(reset))
        .route("/oauth/token", post(oauth_token))
        .route("/health", get(health))
        .with_state(state)
}

fn session_key(explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| DEFAULT_SESSION.to_string())
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let session = session_key(request.session_id);
    let reply = state.runtime.handle_chat(&session, &request.input)?;
    Ok(Json(reply))
}

async fn music(
    State(state): State<AppState>,
    Json(request): Json<MusicRequest>,
) -> Result<Json<MusicReply>, ApiError> {
    let session = session_key(request.session_id);
    let reply = state
        .runtime
        .handle_music(&session, &request.choice, request.music_id.as_deref())
        .await?;
    Ok(Json(reply))
}

async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmissionReceipt>, ApiError> {
    let session = session_key(request.session_id);
    let receipt = state.runtime.handle_submit(&session).await?;
    Ok(Json(receipt))
}

async fn reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Json<ResetResponse> {
    let session = session_key(request.session_id);
    let snapshot = state.runtime.reset(&session);
    Json(ResetResponse { status: "reset", conversation_state: snapshot })
}

async fn oauth_token(
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    let grant = exchange_code_for_token(&request.code)?;
    Ok(Json(grant))
}
