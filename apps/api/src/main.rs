mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::workflow::ContentStore;
use crate::llm_client::ChatCompletionClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("postcraft_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PostCraft API v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key.is_empty() {
        warn!(
            "{} is not set; provider calls will fail authentication",
            config.provider.api_key_env()
        );
    }

    // Initialize LLM client
    let llm = ChatCompletionClient::new(config.provider, config.api_key.clone())?;
    info!(
        "LLM client initialized (provider: {:?}, model: {})",
        config.provider,
        llm.model()
    );

    let store = Arc::new(ContentStore::new(Arc::new(llm), config.image_host.clone()));

    let app = build_router(AppState { store })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the browser form is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
