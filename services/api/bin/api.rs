//! Main Entrypoint for the Micro-tutor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the text generator for the configured provider.
//! 3. Wiring the session store, generation gateway and learning flow.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use chrono::TimeDelta;
use microtutor_api::{
    auth::Credentials,
    config::{Config, Provider},
    router::create_router,
    state::AppState,
};
use microtutor_core::{
    GenerationGateway, LearningFlow, SessionStore,
    llm_client::{MockGenerator, OllamaClient, OpenAICompatibleClient, TextGenerator},
    prompts::PromptTemplates,
};
use std::{collections::HashMap, fs, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Upper bound on how often the idle-session sweep runs.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// Loads `*.md` prompt overrides keyed by file stem. A missing directory yields none.
fn load_prompts(prompts_path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();
    if !prompts_path.is_dir() {
        info!(path = %prompts_path.display(), "No prompts directory; using built-in prompts");
        return Ok(prompts);
    }
    for entry in fs::read_dir(prompts_path)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem")?
                .to_string();
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt {}", path.display()))?;
            prompts.insert(prompt_key, content);
        }
    }
    Ok(prompts)
}

fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match config.provider {
        Provider::Ollama => {
            info!("Using Ollama provider.");
            Arc::new(OllamaClient::new(&config.api_base, &config.chat_model))
        }
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY is required for the openai provider")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(&config.api_base);
            Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
        Provider::Mock => {
            warn!("Using the offline mock provider; replies are canned.");
            Arc::new(MockGenerator)
        }
    };
    Ok(generator)
}

/// Periodically drops sessions that have been idle longer than `ttl`.
fn spawn_idle_sweeper(store: Arc<SessionStore>, ttl: Duration) -> anyhow::Result<()> {
    let max_idle = TimeDelta::from_std(ttl).context("SESSION_IDLE_TTL_SECS is out of range")?;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl.min(MAX_SWEEP_INTERVAL));
        loop {
            ticker.tick().await;
            store.purge_idle(max_idle).await;
        }
    });
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let prompts = PromptTemplates::with_overrides(load_prompts(&config.prompts_path)?);
    let generator = build_generator(&config)?;
    let gateway = GenerationGateway::new(generator, prompts, config.generation_timeout);

    let store = Arc::new(SessionStore::new());
    if let Some(ttl) = config.session_idle_ttl {
        spawn_idle_sweeper(store.clone(), ttl)?;
    }

    let app_state = Arc::new(AppState {
        flow: Arc::new(LearningFlow::new(store, gateway)),
        credentials: Arc::new(Credentials::new(&config.username, &config.password)),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        timeout_secs = config.generation_timeout.as_secs(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
