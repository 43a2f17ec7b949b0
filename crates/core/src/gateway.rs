//! Generation Gateway
//!
//! Turns the raw `generate(prompt)` capability into the three structured
//! operations the learning flow needs: topic decomposition, part explanation
//! and quiz generation. Every model call is bounded by a timeout.

use crate::{
    curriculum::{TARGET_PARTS, parse_numbered_list},
    error::{Result, TutorError},
    llm_client::TextGenerator,
    prompts::PromptTemplates,
    quiz::{Quiz, QuizStep, RetryPolicy, parse_quiz},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const MIN_SIMPLICITY: u8 = 1;
pub const MAX_SIMPLICITY: u8 = 3;

/// Default bound on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// The explanation style instruction for a simplicity level.
///
/// Levels outside 1..=3 use the most scaffolded style.
pub fn simplicity_instruction(level: u8) -> &'static str {
    match level {
        1 => "Use very simple words.",
        2 => "Use simpler words with examples.",
        _ => "Explain like teaching a small child with learning difficulties (SEN) using analogies.",
    }
}

pub struct GenerationGateway {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptTemplates,
    timeout: Duration,
    quiz_retry: RetryPolicy,
}

impl GenerationGateway {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: PromptTemplates, timeout: Duration) -> Self {
        Self {
            generator,
            prompts,
            timeout,
            quiz_retry: RetryPolicy::default(),
        }
    }

    /// Calls the generation capability once, mapping timeouts and failures to
    /// `GenerationUnavailable`.
    async fn call(&self, prompt: &str) -> Result<String> {
        debug!(prompt_len = prompt.len(), "Sending prompt to text generator");
        match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                warn!(error = %e, "Text generation failed");
                Err(TutorError::GenerationUnavailable(format!("{:#}", e)))
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs_f64(), "Text generation timed out");
                Err(TutorError::GenerationUnavailable(format!(
                    "no reply within {:?}",
                    self.timeout
                )))
            }
        }
    }

    /// Breaks `topic` into at most five teaching parts. A shorter list is
    /// accepted as-is.
    pub async fn decompose(&self, topic: &str) -> Result<Vec<String>> {
        let reply = self.call(&self.prompts.render_decompose(topic)).await?;
        let parts = parse_numbered_list(&reply, TARGET_PARTS);
        info!(%topic, parts = parts.len(), "Topic decomposed");
        Ok(parts)
    }

    /// Explains one part at the given simplicity level. The reply is returned verbatim.
    pub async fn explain(&self, topic: &str, part: &str, simplicity_level: u8) -> Result<String> {
        let prompt = self
            .prompts
            .render_explain(topic, part, simplicity_instruction(simplicity_level));
        self.call(&prompt).await
    }

    /// Generates a two-option quiz for a part.
    ///
    /// Replies that fail validation are retried per the retry policy, after
    /// which a fixed fallback quiz is returned. Transport failures are not
    /// retried.
    pub async fn quiz(&self, topic: &str, part: &str) -> Result<Quiz> {
        let prompt = self.prompts.render_quiz(topic, part);
        let mut attempts = 0;
        loop {
            let reply = self.call(&prompt).await?;
            attempts += 1;
            match parse_quiz(&reply).validate() {
                Ok(quiz) => return Ok(quiz),
                Err(e) => {
                    warn!(attempt = attempts, error = %e, "Rejected quiz reply");
                    if self.quiz_retry.after_failure(attempts) == QuizStep::Fallback {
                        warn!(%topic, %part, "Falling back to the default quiz");
                        return Ok(Quiz::fallback());
                    }
                }
            }
        }
    }
}
