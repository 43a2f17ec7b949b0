//! Two-option quiz model and the tolerant parser for model-written quizzes.
//!
//! Expected reply grammar, one item per line, in any order:
//!
//! ```text
//! Question: <text>      (also "Q:")
//! A) <option>           (also "A.")
//! B) <option>           (also "B.")
//! Correct: <A|B>        (also "Answer:")
//! ```
//!
//! Unrecognised lines are ignored and a later matching line overwrites an
//! earlier one.

use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const FALLBACK_QUESTION: &str = "Did you understand the explanation?";

/// One of the two answer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::A => write!(f, "A"),
            Choice::B => write!(f, "B"),
        }
    }
}

impl FromStr for Choice {
    type Err = ();

    /// Accepts `a`/`A`/`b`/`B` with surrounding whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Choice::A),
            "B" | "b" => Ok(Choice::B),
            _ => Err(()),
        }
    }
}

/// A validated quiz ready to be shown to the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: BTreeMap<Choice, String>,
    pub correct: Choice,
}

impl Quiz {
    /// The terminal fallback used when the model never produces a usable quiz.
    pub fn fallback() -> Self {
        Self {
            question: FALLBACK_QUESTION.to_string(),
            options: BTreeMap::from([
                (Choice::A, "Yes".to_string()),
                (Choice::B, "No".to_string()),
            ]),
            correct: Choice::A,
        }
    }
}

/// Whatever could be recovered from a reply before validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QuizDraft {
    pub question: String,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub correct: Option<Choice>,
}

impl QuizDraft {
    /// Accepts the draft only if the question is non-empty, both options are
    /// present and the correct letter was resolved.
    pub fn validate(self) -> Result<Quiz> {
        let mut missing = Vec::new();
        if self.question.is_empty() {
            missing.push("question");
        }
        if self.option_a.is_none() {
            missing.push("option A");
        }
        if self.option_b.is_none() {
            missing.push("option B");
        }
        if self.correct.is_none() {
            missing.push("correct letter");
        }

        match (self.option_a, self.option_b, self.correct) {
            (Some(a), Some(b), Some(correct)) if missing.is_empty() => Ok(Quiz {
                question: self.question,
                options: BTreeMap::from([(Choice::A, a), (Choice::B, b)]),
                correct,
            }),
            _ => Err(TutorError::MalformedGenerationOutput(format!(
                "quiz reply is missing {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Parses a free-text reply into a draft. Never fails; see [`QuizDraft::validate`].
pub fn parse_quiz(text: &str) -> QuizDraft {
    let mut draft = QuizDraft::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = line
            .strip_prefix("Question:")
            .or_else(|| line.strip_prefix("Q:"))
        {
            draft.question = rest.trim().to_string();
        } else if let Some(value) = option_value(line, 'A') {
            draft.option_a = Some(value);
        } else if let Some(value) = option_value(line, 'B') {
            draft.option_b = Some(value);
        } else if let Some(rest) = line
            .strip_prefix("Correct:")
            .or_else(|| line.strip_prefix("Answer:"))
        {
            draft.correct = resolve_correct(rest);
        }
    }

    draft
}

/// Value of an `A)`/`A.` style line. The split is on the first `)` anywhere in
/// the line, else the first `.`.
fn option_value(line: &str, letter: char) -> Option<String> {
    let rest = line.strip_prefix(letter)?;
    if !rest.starts_with(')') && !rest.starts_with('.') {
        return None;
    }
    let (_, value) = line.split_once(')').or_else(|| line.split_once('.'))?;
    Some(value.trim().to_string())
}

/// Finds the answer letter anywhere in a `Correct:` value, ignoring case and
/// preferring A when both letters appear.
fn resolve_correct(value: &str) -> Option<Choice> {
    let upper = value.to_uppercase();
    if upper.contains('A') {
        Some(Choice::A)
    } else if upper.contains('B') {
        Some(Choice::B)
    } else {
        None
    }
}

/// What to do after a quiz reply failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Retry,
    Fallback,
}

/// Bounded retry policy for quiz generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

impl RetryPolicy {
    /// Decides the next step after `attempts_made` replies were all rejected.
    pub fn after_failure(&self, attempts_made: u32) -> QuizStep {
        if attempts_made < self.max_attempts {
            QuizStep::Retry
        } else {
            QuizStep::Fallback
        }
    }
}
