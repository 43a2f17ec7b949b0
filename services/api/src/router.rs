//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AnswerPayload, AnswerResponse, EmotionPayload, EmotionResponse, ErrorResponse,
        HealthResponse, LearningResponse, LoginPayload, LoginResponse, SessionResponse,
        StartLearningPayload,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::login,
        handlers::update_emotion,
        handlers::start_learning,
        handlers::submit_answer,
        handlers::get_session,
    ),
    components(
        schemas(
            LoginPayload, LoginResponse, EmotionPayload, EmotionResponse, StartLearningPayload,
            LearningResponse, AnswerPayload, AnswerResponse, SessionResponse, HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Micro-tutor API", description = "Adaptive micro-tutoring sessions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/emotion/update", post(handlers::update_emotion))
        .route("/learning/start", post(handlers::start_learning))
        .route("/learning/answer", post(handlers::submit_answer))
        .route("/learning/session", get(handlers::get_session))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use microtutor_core::{
        GenerationGateway, LearningFlow, SessionStore,
        gateway::DEFAULT_GENERATION_TIMEOUT,
        llm_client::{MockGenerator, TextGenerator},
        prompts::PromptTemplates,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with(generator: Arc<dyn TextGenerator>) -> Router {
        let gateway =
            GenerationGateway::new(generator, PromptTemplates::default(), DEFAULT_GENERATION_TIMEOUT);
        let flow = LearningFlow::new(Arc::new(SessionStore::new()), gateway);
        create_router(Arc::new(AppState {
            flow: Arc::new(flow),
            credentials: Arc::new(Credentials::new("student1", "test123")),
        }))
    }

    fn app() -> Router {
        app_with(Arc::new(MockGenerator))
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn login(app: &Router) -> String {
        let (status, body) = post_json(
            app,
            "/auth/login",
            json!({"username": "student1", "password": "test123"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["session_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let (status, body) = post_json(
            &app(),
            "/auth/login",
            json!({"username": "student1", "password": "nope"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_learning_round_trip() {
        let app = app();
        let token = login(&app).await;

        let (status, body) = post_json(
            &app,
            "/emotion/update",
            json!({"session_token": token, "emotion": "happy"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "emotion updated");

        let (status, first) = post_json(
            &app,
            "/learning/start",
            json!({"session_token": token, "topic": "Photosynthesis"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["part_number"], 1);
        assert_eq!(first["total_parts"], 5);
        assert_eq!(first["completed"], false);
        assert!(!first["content"].as_str().unwrap().is_empty());
        assert_eq!(first["options"].as_object().unwrap().len(), 2);

        let (status, decision) = post_json(
            &app,
            "/learning/answer",
            json!({"session_token": token, "selected_option": "A"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            decision,
            json!({"move_forward": true, "correct": true, "emotion": "happy", "next_action": "advance"})
        );

        let (status, second) =
            post_json(&app, "/learning/start", json!({"session_token": token})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["part_number"], 2);
        assert_eq!(second["status"], "moving_to_next_part");

        let request = Request::get("/learning/session")
            .header("x-session-token", &token)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let view: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view["current_part_index"], 1);
        assert_eq!(view["simplicity_level"], 1);
        assert!(view.get("correct_option").is_none());
    }

    #[tokio::test]
    async fn test_start_errors_map_to_status_codes() {
        let app = app();
        let token = login(&app).await;

        let (status, body) =
            post_json(&app, "/learning/start", json!({"session_token": token})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Topic required");

        let (status, _) = post_json(
            &app,
            "/learning/start",
            json!({"session_token": "unknown", "topic": "Cells"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post_json(
            &app,
            "/learning/answer",
            json!({"session_token": "unknown", "selected_option": "A"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_emotion_update_for_unknown_token_succeeds() {
        let (status, body) = post_json(
            &app(),
            "/emotion/update",
            json!({"session_token": "ghost", "emotion": "confused"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["emotion"], "confused");
    }

    struct DownGenerator;

    #[async_trait]
    impl TextGenerator for DownGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_generation_failure_is_service_unavailable() {
        let app = app_with(Arc::new(DownGenerator));
        let token = login(&app).await;

        let (status, body) = post_json(
            &app,
            "/learning/start",
            json!({"session_token": token, "topic": "Cells"}),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["message"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_session_endpoint_requires_header() {
        let response = app()
            .oneshot(Request::get("/learning/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
