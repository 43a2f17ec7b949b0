use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported text-generation backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
    Mock,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub generation_timeout: Duration,
    /// `None` disables idle-session purging.
    pub session_idle_ttl: Option<Duration>,
    pub username: String,
    pub password: String,
    pub log_level: Level,
    pub prompts_path: PathBuf,
}

fn parse_secs(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(var.to_string(), format!("'{}' is not a number of seconds", raw))
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "ollama".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "ollama" => Provider::Ollama,
            "openai" => Provider::OpenAI,
            "mock" => Provider::Mock,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LLM_PROVIDER".to_string(),
                    format!("'{}' is not one of ollama, openai, mock", other),
                ));
            }
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        if provider == Provider::OpenAI && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar(
                "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
            ));
        }

        let (default_base, default_model) = match provider {
            Provider::OpenAI => ("https://api.openai.com/v1/", "gpt-4o"),
            Provider::Ollama | Provider::Mock => (microtutor_core::llm_client::DEFAULT_OLLAMA_URL, "phi3"),
        };
        let api_base = std::env::var("LLM_API_BASE").unwrap_or_else(|_| default_base.to_string());
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| default_model.to_string());

        let generation_timeout = match parse_secs("GENERATION_TIMEOUT_SECS", 120)? {
            0 => {
                return Err(ConfigError::InvalidValue(
                    "GENERATION_TIMEOUT_SECS".to_string(),
                    "timeout must be greater than zero".to_string(),
                ));
            }
            secs => Duration::from_secs(secs),
        };
        let session_idle_ttl = match parse_secs("SESSION_IDLE_TTL_SECS", 3600)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let username = std::env::var("TUTOR_USERNAME").unwrap_or_else(|_| "student1".to_string());
        let password = std::env::var("TUTOR_PASSWORD").unwrap_or_else(|_| "test123".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        Ok(Self {
            bind_address,
            provider,
            openai_api_key,
            api_base,
            chat_model,
            generation_timeout,
            session_idle_ttl,
            username,
            password,
            log_level,
            prompts_path,
        })
    }
}
