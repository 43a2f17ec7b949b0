//! API Models
//!
//! Request and response bodies for the HTTP surface, annotated for OpenAPI
//! generation with `utoipa`.

use chrono::{DateTime, Utc};
use microtutor_core::{AnswerOutcome, StartOutcome, session::SessionView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginPayload {
    #[schema(example = "student1")]
    pub username: String,
    #[schema(example = "test123")]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub session_token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct EmotionPayload {
    pub session_token: String,
    #[schema(example = "confused")]
    pub emotion: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EmotionResponse {
    #[schema(example = "emotion updated")]
    pub status: String,
    pub emotion: String,
}

#[derive(Deserialize, ToSchema)]
pub struct StartLearningPayload {
    pub session_token: String,
    /// A non-empty topic always starts that topic from its first part.
    #[schema(example = "Photosynthesis")]
    pub topic: Option<String>,
}

/// Either the next part's explanation and quiz, or a completion notice.
#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct LearningResponse {
    pub completed: bool,
    #[schema(example = "moving_to_next_part")]
    pub status: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Answer options keyed by letter (`A`, `B`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    pub part_number: usize,
    pub total_parts: usize,
}

impl From<StartOutcome> for LearningResponse {
    fn from(outcome: StartOutcome) -> Self {
        match outcome {
            StartOutcome::Content(part) => Self {
                completed: part.completed,
                status: part.status.as_str().to_string(),
                content: part.content,
                question: Some(part.question),
                options: Some(
                    part.options
                        .into_iter()
                        .map(|(letter, text)| (letter.to_string(), text))
                        .collect(),
                ),
                part_number: part.part_number,
                total_parts: part.total_parts,
            },
            StartOutcome::Completed(done) => Self {
                completed: done.completed,
                status: done.status.as_str().to_string(),
                content: done.content,
                question: None,
                options: None,
                part_number: done.part_number,
                total_parts: done.total_parts,
            },
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AnswerPayload {
    pub session_token: String,
    #[schema(example = "A")]
    pub selected_option: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct AnswerResponse {
    pub move_forward: bool,
    pub correct: bool,
    pub emotion: String,
    #[schema(example = "advance")]
    pub next_action: String,
}

impl From<AnswerOutcome> for AnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        Self {
            move_forward: outcome.move_forward,
            correct: outcome.correct,
            emotion: outcome.emotion,
            next_action: outcome.next_action.to_string(),
        }
    }
}

/// Read-only session view; never includes the correct option.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SessionResponse {
    pub topic: Option<String>,
    pub parts: Vec<String>,
    pub current_part_index: usize,
    pub simplicity_level: u8,
    pub last_emotion: String,
    pub pending_action: Option<String>,
    pub current_question: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl From<SessionView> for SessionResponse {
    fn from(view: SessionView) -> Self {
        Self {
            topic: view.topic,
            parts: view.parts,
            current_part_index: view.current_part_index,
            simplicity_level: view.simplicity_level,
            last_emotion: view.last_emotion,
            pending_action: view.pending_action.map(|a| a.to_string()),
            current_question: view.current_question,
            created_at: view.created_at,
            last_active: view.last_active,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
