//! Axum Handlers for the REST API
//!
//! Thin adapters from HTTP requests to the learning flow. Each handler is
//! documented with `utoipa` so the OpenAPI document stays in sync.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use microtutor_core::TutorError;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{
        AnswerPayload, AnswerResponse, EmotionPayload, EmotionResponse, ErrorResponse,
        HealthResponse, LearningResponse, LoginPayload, LoginResponse, SessionResponse,
        StartLearningPayload,
    },
    state::AppState,
};

pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    ServiceUnavailable(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::ServiceUnavailable(message) => {
                warn!("Generation unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse {
                        message: "The tutor is unavailable right now. Please try again.".to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            TutorError::SessionNotFound => Self::NotFound(err.to_string()),
            TutorError::TopicRequired => Self::BadRequest(err.to_string()),
            TutorError::GenerationUnavailable(message) => Self::ServiceUnavailable(message),
            TutorError::MalformedGenerationOutput(_) => Self::InternalServerError(err.into()),
        }
    }
}

/// Service liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Log in with the configured account and open a learning session.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session_token = state
        .credentials
        .authenticate(&payload.username, &payload.password)
        .inspect_err(|_| warn!(username = %payload.username, "Rejected login"))?;

    state.flow.store().create(&session_token).await;
    info!(username = %payload.username, "Learner logged in");

    Ok(Json(LoginResponse { session_token }))
}

/// Record the learner's current emotion. Unknown tokens are silently ignored.
#[utoipa::path(
    post,
    path = "/emotion/update",
    request_body = EmotionPayload,
    responses((status = 200, description = "Emotion recorded", body = EmotionResponse))
)]
pub async fn update_emotion(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmotionPayload>,
) -> Json<EmotionResponse> {
    state
        .flow
        .update_emotion(&payload.session_token, &payload.emotion)
        .await;

    Json(EmotionResponse {
        status: "emotion updated".to_string(),
        emotion: payload.emotion,
    })
}

/// Start a topic, or fetch the next content for the current one.
#[utoipa::path(
    post,
    path = "/learning/start",
    request_body = StartLearningPayload,
    responses(
        (status = 200, description = "Part content or completion notice", body = LearningResponse),
        (status = 400, description = "No topic supplied and none active", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 503, description = "Text generation unavailable", body = ErrorResponse)
    )
)]
pub async fn start_learning(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StartLearningPayload>,
) -> Result<Json<LearningResponse>, ApiError> {
    let outcome = state
        .flow
        .start(&payload.session_token, payload.topic.as_deref())
        .await?;
    Ok(Json(outcome.into()))
}

/// Submit an answer to the outstanding quiz.
#[utoipa::path(
    post,
    path = "/learning/answer",
    request_body = AnswerPayload,
    responses(
        (status = 200, description = "Answer graded and next action recorded", body = AnswerResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnswerPayload>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let outcome = state
        .flow
        .answer(&payload.session_token, &payload.selected_option)
        .await?;
    Ok(Json(outcome.into()))
}

/// Inspect the current session state.
#[utoipa::path(
    get,
    path = "/learning/session",
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 400, description = "Missing session token header", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("x-session-token" = String, Header, description = "Token returned by login")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let token = headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("x-session-token header is required".to_string()))?;

    let view = state.flow.snapshot(token).await?;
    Ok(Json(view.into()))
}
