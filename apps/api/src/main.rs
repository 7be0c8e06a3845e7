mod advisory;
mod analytics;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod records;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{memory::MemoryStore, postgres::PgStore, EntityStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the entity store
    let store: Arc<dyn EntityStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize LLM client when an advisory key is configured
    let llm = match config.advisor_api_key.as_deref() {
        Some(key) if config.advisor_configured() => {
            let client = LlmClient::new(
                config.advisor_api_url.clone(),
                key.to_string(),
                config.advisor_model.clone(),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        _ => {
            warn!("ADVISOR_API_KEY not configured; advisory endpoints use local heuristics");
            None
        }
    };

    // Build app state
    let state = AppState {
        store,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
