//! Text Generation Clients
//!
//! The tutoring core only needs one capability from a language model: turn a
//! prompt into text. This module defines that contract and the backends that
//! fulfil it.

use anyhow::{Context, Result, anyhow};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default endpoint of a local Ollama daemon.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// A generic text-generation capability: one prompt in, one reply out.
///
/// Implementations report every failure (transport, non-2xx status, malformed
/// body) as an error; callers decide how to classify it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as a single user message and returns the reply text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// An implementation of `TextGenerator` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAICompatibleClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;

        Ok(content)
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

/// A `TextGenerator` that talks to Ollama's native `/api/chat` endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Creates a client for the Ollama daemon at `base_url` using `model`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let response = self
            .http
            .post(self.chat_url())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_ollama_reply(&body)
    }
}

fn parse_ollama_reply(body: &str) -> Result<String> {
    let reply: OllamaChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("Unexpected Ollama response body: {}", e))?;
    Ok(reply.message.content)
}

/// A deterministic `TextGenerator` for development without a model server.
///
/// It recognises the three tutoring prompts by their format instructions and
/// answers each with output the gateway parses cleanly.
pub struct MockGenerator;

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let reply = if prompt.contains("Correct:") {
            "Question: Which option repeats what the explanation said?\n\
             A) The idea we just learned\n\
             B) Something we did not talk about\n\
             Correct: A"
                .to_string()
        } else if prompt.contains("numbered list") {
            (1..=5)
                .map(|n| format!("{}. Step {} of the topic", n, n))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            "This part is about one small idea. Think of it like a building block.".to_string()
        };
        Ok(reply)
    }
}
