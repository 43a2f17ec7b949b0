//! Learning Flow Controller
//!
//! Drives a session through topic decomposition, explanation, quizzing and
//! the pacing decision. `start` produces content and applies whatever action
//! the previous `answer` recorded; `answer` only records the decision.

use crate::{
    error::{Result, TutorError},
    gateway::{GenerationGateway, MAX_SIMPLICITY, MIN_SIMPLICITY},
    policy::{NextAction, decide},
    quiz::Choice,
    session::{Lesson, LessonState, SessionView},
    store::SessionStore,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

pub const COMPLETION_MESSAGE: &str = "🎉 Great job! You have successfully completed this topic.";
pub const EXHAUSTED_PARTS_MESSAGE: &str = "Topic Completed.";
/// Display value reported on completion, independent of the real part count.
pub const NOMINAL_TOTAL_PARTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    StartingTopic,
    MovingToNextPart,
    ReExplainingSamePart,
    PresentingCurrentPart,
    TopicCompleted,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::StartingTopic => "starting_topic",
            ContentStatus::MovingToNextPart => "moving_to_next_part",
            ContentStatus::ReExplainingSamePart => "re_explaining_same_part",
            ContentStatus::PresentingCurrentPart => "presenting_current_part",
            ContentStatus::TopicCompleted => "topic_completed",
        }
    }
}

/// An explanation plus the quiz for the part being presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartContent {
    pub completed: bool,
    pub status: ContentStatus,
    pub content: String,
    pub question: String,
    pub options: BTreeMap<Choice, String>,
    pub part_number: usize,
    pub total_parts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub completed: bool,
    pub status: ContentStatus,
    pub content: String,
    pub part_number: usize,
    pub total_parts: usize,
}

impl Completion {
    fn new(content: &str, part_number: usize, total_parts: usize) -> Self {
        Self {
            completed: true,
            status: ContentStatus::TopicCompleted,
            content: content.to_string(),
            part_number,
            total_parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StartOutcome {
    Content(PartContent),
    Completed(Completion),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub move_forward: bool,
    pub correct: bool,
    pub emotion: String,
    pub next_action: NextAction,
}

pub struct LearningFlow {
    store: Arc<SessionStore>,
    gateway: GenerationGateway,
}

impl LearningFlow {
    pub fn new(store: Arc<SessionStore>, gateway: GenerationGateway) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Produces the next piece of content for a session.
    ///
    /// A non-empty `topic` always starts that topic afresh. Without one, the
    /// pending action from the last answer (if any) is applied exactly once
    /// and the resulting part is presented.
    #[instrument(skip(self, token), fields(token = %short(token)))]
    pub async fn start(&self, token: &str, topic: Option<&str>) -> Result<StartOutcome> {
        let handle = self.store.get(token).await.ok_or(TutorError::SessionNotFound)?;
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        session.touch();

        let requested = topic.map(str::trim).filter(|t| !t.is_empty());
        if let Some(topic) = requested {
            let parts = self.gateway.decompose(topic).await?;
            info!(%topic, parts = parts.len(), "Starting new topic");
            session.lesson = LessonState::Presenting(Lesson::new(topic.to_string(), parts));
            session.pending_action = None;
        }

        let LessonState::Presenting(lesson) = &mut session.lesson else {
            return Err(TutorError::TopicRequired);
        };

        let status = if requested.is_some() {
            ContentStatus::StartingTopic
        } else {
            match session.pending_action.take() {
                Some(NextAction::Advance) if lesson.is_last_part() => {
                    info!(topic = %lesson.topic, "Topic completed");
                    session.reset_lesson();
                    return Ok(StartOutcome::Completed(Completion::new(
                        COMPLETION_MESSAGE,
                        NOMINAL_TOTAL_PARTS,
                        NOMINAL_TOTAL_PARTS,
                    )));
                }
                Some(NextAction::Advance) => {
                    lesson.part_index += 1;
                    lesson.simplicity = MIN_SIMPLICITY;
                    ContentStatus::MovingToNextPart
                }
                Some(NextAction::RepeatSimpler) => {
                    lesson.simplicity = (lesson.simplicity + 1).min(MAX_SIMPLICITY);
                    ContentStatus::ReExplainingSamePart
                }
                Some(NextAction::Repeat) => ContentStatus::ReExplainingSamePart,
                None => ContentStatus::PresentingCurrentPart,
            }
        };

        let total_parts = lesson.parts.len();
        if lesson.part_index >= total_parts {
            return Ok(StartOutcome::Completed(Completion::new(
                EXHAUSTED_PARTS_MESSAGE,
                total_parts,
                total_parts,
            )));
        }

        let part = lesson.parts[lesson.part_index].clone();
        let content = self
            .gateway
            .explain(&lesson.topic, &part, lesson.simplicity)
            .await?;
        let quiz = self.gateway.quiz(&lesson.topic, &part).await?;

        info!(
            ?status,
            part_number = lesson.part_index + 1,
            total_parts,
            simplicity = lesson.simplicity,
            "Presenting part"
        );

        let payload = PartContent {
            completed: false,
            status,
            content,
            question: quiz.question.clone(),
            options: quiz.options.clone(),
            part_number: lesson.part_index + 1,
            total_parts,
        };
        lesson.issued_quiz = Some(quiz);
        Ok(StartOutcome::Content(payload))
    }

    /// Grades an answer against the outstanding quiz and records the next action.
    ///
    /// No content is generated here; the action takes effect on the next `start`.
    #[instrument(skip(self, token), fields(token = %short(token)))]
    pub async fn answer(&self, token: &str, selected_option: &str) -> Result<AnswerOutcome> {
        let handle = self.store.get(token).await.ok_or(TutorError::SessionNotFound)?;
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        session.touch();

        let expected = match &mut session.lesson {
            LessonState::Presenting(lesson) => lesson.issued_quiz.take().map(|q| q.correct),
            LessonState::NoTopic => None,
        };
        let correct = match (selected_option.parse::<Choice>(), expected) {
            (Ok(selected), Some(expected)) => selected == expected,
            _ => false,
        };

        let next_action = decide(correct, &session.last_emotion);
        session.pending_action = Some(next_action);
        info!(correct, emotion = %session.last_emotion, %next_action, "Answer graded");

        Ok(AnswerOutcome {
            move_forward: next_action == NextAction::Advance,
            correct,
            emotion: session.last_emotion.to_string(),
            next_action,
        })
    }

    /// Records the learner's emotion; unknown tokens are ignored.
    pub async fn update_emotion(&self, token: &str, emotion: &str) {
        if !self.store.update_emotion(token, emotion).await {
            info!(token = %short(token), "Emotion update for unknown session ignored");
        }
    }

    pub async fn snapshot(&self, token: &str) -> Result<SessionView> {
        self.store
            .snapshot(token)
            .await
            .map(|s| s.view())
            .ok_or(TutorError::SessionNotFound)
    }
}

/// Token prefix for log fields.
fn short(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
