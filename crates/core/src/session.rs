//! Learning Session Model
//!
//! A session belongs to one learner token. Lesson progress is an explicit
//! state: either no topic is active, or a topic is being presented part by
//! part. Completion is transient: the flow reports it and returns the
//! session to `NoTopic`.

use crate::{
    gateway::MIN_SIMPLICITY,
    policy::{Emotion, NextAction},
    quiz::{Choice, Quiz},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Progress through a single topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub topic: String,
    pub parts: Vec<String>,
    pub part_index: usize,
    pub simplicity: u8,
    /// The quiz most recently shown for the current part, until answered.
    pub issued_quiz: Option<Quiz>,
}

impl Lesson {
    pub fn new(topic: String, parts: Vec<String>) -> Self {
        Self {
            topic,
            parts,
            part_index: 0,
            simplicity: MIN_SIMPLICITY,
            issued_quiz: None,
        }
    }

    pub fn is_last_part(&self) -> bool {
        self.part_index + 1 >= self.parts.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LessonState {
    #[default]
    NoTopic,
    Presenting(Lesson),
}

/// The per-learner session record.
#[derive(Debug, Clone)]
pub struct Session {
    pub last_emotion: Emotion,
    /// Decision from the last answer, consumed exactly once by the next content request.
    pub pending_action: Option<NextAction>,
    pub lesson: LessonState,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            last_emotion: Emotion::default(),
            pending_action: None,
            lesson: LessonState::NoTopic,
            created_at: now,
            last_active: now,
        }
    }
}

impl Session {
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Returns lesson fields to their defaults.
    pub fn reset_lesson(&mut self) {
        self.lesson = LessonState::NoTopic;
        self.pending_action = None;
    }

    pub fn topic(&self) -> Option<&str> {
        match &self.lesson {
            LessonState::NoTopic => None,
            LessonState::Presenting(lesson) => Some(&lesson.topic),
        }
    }

    pub fn parts(&self) -> &[String] {
        match &self.lesson {
            LessonState::NoTopic => &[],
            LessonState::Presenting(lesson) => &lesson.parts,
        }
    }

    pub fn current_part_index(&self) -> usize {
        match &self.lesson {
            LessonState::NoTopic => 0,
            LessonState::Presenting(lesson) => lesson.part_index,
        }
    }

    pub fn simplicity_level(&self) -> u8 {
        match &self.lesson {
            LessonState::NoTopic => MIN_SIMPLICITY,
            LessonState::Presenting(lesson) => lesson.simplicity,
        }
    }

    fn issued_quiz(&self) -> Option<&Quiz> {
        match &self.lesson {
            LessonState::NoTopic => None,
            LessonState::Presenting(lesson) => lesson.issued_quiz.as_ref(),
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        self.issued_quiz().map(|q| q.question.as_str())
    }

    pub fn correct_option(&self) -> Option<Choice> {
        self.issued_quiz().map(|q| q.correct)
    }

    /// A read-only view that does not reveal the correct option.
    pub fn view(&self) -> SessionView {
        SessionView {
            topic: self.topic().map(str::to_string),
            parts: self.parts().to_vec(),
            current_part_index: self.current_part_index(),
            simplicity_level: self.simplicity_level(),
            last_emotion: self.last_emotion.to_string(),
            pending_action: self.pending_action,
            current_question: self.current_question().map(str::to_string),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub topic: Option<String>,
    pub parts: Vec<String>,
    pub current_part_index: usize,
    pub simplicity_level: u8,
    pub last_emotion: String,
    pub pending_action: Option<NextAction>,
    pub current_question: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_default_fields() {
        let session = Session::default();
        assert_eq!(session.topic(), None);
        assert!(session.parts().is_empty());
        assert_eq!(session.current_part_index(), 0);
        assert_eq!(session.simplicity_level(), 1);
        assert_eq!(session.last_emotion, Emotion::Neutral);
        assert_eq!(session.pending_action, None);
        assert_eq!(session.correct_option(), None);
    }

    #[test]
    fn test_view_hides_correct_option() {
        let mut lesson = Lesson::new("Plants".into(), vec!["Roots".into()]);
        lesson.issued_quiz = Some(Quiz::fallback());
        let session = Session {
            lesson: LessonState::Presenting(lesson),
            ..Session::default()
        };

        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["topic"], "Plants");
        assert_eq!(json["current_question"], "Did you understand the explanation?");
        assert!(json.get("correct_option").is_none());
    }

    #[test]
    fn test_is_last_part() {
        let mut lesson = Lesson::new("T".into(), vec!["a".into(), "b".into()]);
        assert!(!lesson.is_last_part());
        lesson.part_index = 1;
        assert!(lesson.is_last_part());
        assert!(Lesson::new("T".into(), vec![]).is_last_part());
    }
}
