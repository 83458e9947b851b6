mod applications;
mod augmentation;
mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::augmentation::AnthropicAugmentor;
use crate::config::Config;
use crate::db::create_pool;
use crate::matching::assessor::CompatibilityAssessor;
use crate::matching::fanout::FanOutOrchestrator;
use crate::matching::scorer::EntropyJitter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Augmentation client + jitter source are injected here; tests use stubs.
    let augmentor = Arc::new(AnthropicAugmentor::new(config.anthropic_api_key.clone()));
    info!(
        "Augmentation client initialized (model: {})",
        augmentation::MODEL
    );

    let assessor = Arc::new(CompatibilityAssessor::new(
        augmentor,
        Arc::new(EntropyJitter),
    ));
    let orchestrator = Arc::new(FanOutOrchestrator::new(Arc::clone(&assessor)));

    // Build app state
    let state = AppState {
        db,
        assessor,
        orchestrator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
