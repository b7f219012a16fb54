// file: src/server/mod.rs
// description: HTTP service wiring: router, shared state, startup
// reference: axum service composition

pub mod error;
pub mod handlers;
pub mod models;

pub use error::ApiError;

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, HashEmbedder, RemoteEmbeddingClient};
use crate::error::{RagError, Result};
use crate::llm::{AnswerGenerator, LlmClient};
use crate::store::VectorStore;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state passed to every handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<VectorStore>>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub generator: Arc<dyn AnswerGenerator>,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/embed", post(handlers::embed))
        .route("/search", post(handlers::search))
        .route("/answer", post(handlers::answer))
        .layer(cors)
        .with_state(state)
}

/// Build the service components from configuration.
///
/// The embedder falls back to the deterministic hash embedder when no
/// embedding API key is configured; the LLM client has no such fallback and
/// requires a key.
pub fn build_state(config: &Config) -> Result<AppState> {
    let store = VectorStore::open(&config.store.index_path, config.store.dimension)?;

    let embedder: Arc<dyn EmbeddingProvider> = match config
        .embedding
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
    {
        Some(api_key) => {
            info!("Using remote embedding API ({})", config.embedding.model);
            Arc::new(RemoteEmbeddingClient::new(
                &config.embedding,
                api_key,
                config.store.dimension,
            ))
        }
        None => {
            warn!("No embedding API key configured, using hash embedder");
            Arc::new(HashEmbedder::new(config.store.dimension))
        }
    };

    let generator: Arc<dyn AnswerGenerator> = Arc::new(LlmClient::new(&config.llm)?);

    Ok(AppState {
        store: Arc::new(RwLock::new(store)),
        embedder,
        generator,
    })
}

/// Run the HTTP service until shutdown.
pub async fn run(config: &Config) -> Result<()> {
    let state = build_state(config)?;
    let router = create_router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RagError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| RagError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
