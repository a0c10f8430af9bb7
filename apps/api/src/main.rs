mod config;
mod errors;
mod llm_client;
mod models;
mod review;
mod routes;
mod state;
mod store;
mod tasks;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::review::ai_search::{CandidateOracle, LlmCandidateOracle};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ScoreHub API v{}", env!("CARGO_PKG_VERSION"));

    // AI search is only offered when an API key is configured
    let oracle: Option<Arc<dyn CandidateOracle>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmCandidateOracle(llm)))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, AI search disabled");
            None
        }
    };

    // Build app state (seeds the in-memory resume list)
    let state = AppState::new(config.clone(), oracle);
    info!(
        resumes = state.snapshot().store.len(),
        page_size = config.page_size,
        "Resume store seeded"
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS once the dashboard origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
