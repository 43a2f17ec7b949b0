//! Prompt templates for the three tutoring requests.
//!
//! Templates use `{topic}`, `{part}` and `{simplicity}` placeholders. The
//! built-in defaults can be replaced per key from a directory of `.md` files.

use std::collections::HashMap;
use tracing::{debug, warn};

pub const DECOMPOSE_TOPIC_KEY: &str = "decompose_topic";
pub const EXPLAIN_PART_KEY: &str = "explain_part";
pub const GENERATE_QUIZ_KEY: &str = "generate_quiz";

const DEFAULT_DECOMPOSE_TOPIC: &str = r#"Break the topic "{topic}" into exactly 5 simple teaching parts
suitable for a 13-15 year old child with learning difficulties (SEN).

Rules:
- Return ONLY a numbered list
- No explanations
"#;

const DEFAULT_EXPLAIN_PART: &str = r#"Topic: {topic}
Part: {part}

Explain this part.
{simplicity}

Rules:
- Do not introduce new concepts
- Keep explanation short and clear
"#;

const DEFAULT_GENERATE_QUIZ: &str = r#"You are teaching a child.

From the explanation about:
Topic: {topic}
Part: {part}

Create ONE very simple multiple-choice question.

Rules:
- The answer must be directly available in the explanation
- Only 2 options (A and B)
- Clearly mention which option is correct

Format EXACTLY like this:
Question: <question>
A) <option>
B) <option>
Correct: A or B
"#;

/// The set of templates the generation gateway renders prompts from.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub decompose_topic: String,
    pub explain_part: String,
    pub generate_quiz: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            decompose_topic: DEFAULT_DECOMPOSE_TOPIC.to_string(),
            explain_part: DEFAULT_EXPLAIN_PART.to_string(),
            generate_quiz: DEFAULT_GENERATE_QUIZ.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Builds templates from the defaults, replacing any entry whose key is
    /// present in `overrides`. Unknown keys are logged and ignored.
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        let mut templates = Self::default();
        for (key, template) in overrides {
            match key.as_str() {
                DECOMPOSE_TOPIC_KEY => templates.decompose_topic = template,
                EXPLAIN_PART_KEY => templates.explain_part = template,
                GENERATE_QUIZ_KEY => templates.generate_quiz = template,
                _ => {
                    warn!(prompt = %key, "Ignoring unknown prompt template");
                    continue;
                }
            }
            debug!(prompt = %key, "Prompt template overridden");
        }
        templates
    }

    pub fn render_decompose(&self, topic: &str) -> String {
        fill(&self.decompose_topic, &[("topic", topic)])
    }

    pub fn render_explain(&self, topic: &str, part: &str, simplicity: &str) -> String {
        fill(
            &self.explain_part,
            &[("topic", topic), ("part", part), ("simplicity", simplicity)],
        )
    }

    pub fn render_quiz(&self, topic: &str, part: &str) -> String {
        fill(&self.generate_quiz, &[("topic", topic), ("part", part)])
    }
}

/// Substitutes `{name}` placeholders in a single pass, so text inserted for
/// one placeholder is never expanded again. Unknown placeholders are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_render_placeholders() {
        let templates = PromptTemplates::default();

        let decompose = templates.render_decompose("Photosynthesis");
        assert!(decompose.contains("\"Photosynthesis\""));
        assert!(decompose.contains("numbered list"));

        let explain = templates.render_explain("Photosynthesis", "Sunlight", "Use very simple words.");
        assert!(explain.contains("Part: Sunlight"));
        assert!(explain.contains("Use very simple words."));
        assert!(!explain.contains('{'));

        let quiz = templates.render_quiz("Photosynthesis", "Sunlight");
        assert!(quiz.contains("Correct: A or B"));
    }

    #[test]
    fn test_overrides_replace_known_keys_only() {
        let mut overrides = HashMap::new();
        overrides.insert(EXPLAIN_PART_KEY.to_string(), "Explain {part} of {topic}".to_string());
        overrides.insert("system_prompt".to_string(), "ignored".to_string());

        let templates = PromptTemplates::with_overrides(overrides);
        assert_eq!(templates.render_explain("Cells", "Nucleus", ""), "Explain Nucleus of Cells");
        assert_eq!(templates.decompose_topic, PromptTemplates::default().decompose_topic);
    }

    #[test]
    fn test_inserted_text_is_not_expanded_again() {
        let templates = PromptTemplates::default();
        let explain = templates.render_explain("Sets {part} and {simplicity}", "Unions", "Be brief.");
        assert!(explain.contains("Topic: Sets {part} and {simplicity}"));
        assert!(explain.contains("Part: Unions"));

        let quiz = templates.render_quiz("Braces {topic}", "{part}");
        assert!(quiz.contains("Topic: Braces {topic}"));
        assert!(quiz.contains("Part: {part}"));
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(
            fill("{greeting} {topic}!", &[("topic", "cells")]),
            "{greeting} cells!"
        );
    }
}
