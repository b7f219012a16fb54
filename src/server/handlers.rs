// file: src/server/handlers.rs
// description: HTTP request handlers for the embed/search/answer cycle
// reference: endpoint semantics of the RAG request/response cycle

use crate::llm::build_prompt;
use crate::server::models::*;
use crate::server::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use tracing::info;

/// `GET /`
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "RAG Foundations API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let total_chunks = state.store.read().await.len();

    // Components are constructed before the router starts serving, so their
    // presence is unconditional; the flags mirror the documented shape.
    Json(HealthResponse {
        status: "healthy".to_string(),
        components: HealthComponents {
            vector_store: true,
            embedder: true,
            llm_client: true,
        },
        total_chunks,
    })
}

/// `POST /embed`: embed texts and store them with their metadata.
pub async fn embed(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    if let Some(ref metadata) = request.metadata {
        if metadata.len() != request.texts.len() {
            return Err(ApiError::BadRequest(
                "Number of metadata items must match number of texts".to_string(),
            ));
        }
    }

    let embeddings = state.embedder.embed_texts(&request.texts).await?;

    let count = state
        .store
        .write()
        .await
        .add_chunks(request.texts, embeddings, request.metadata)?;

    info!("Embedded {} documents", count);

    Ok(Json(EmbedResponse {
        message: format!("Successfully embedded {} documents", count),
        count,
    }))
}

/// `POST /search`: top-k similarity search over stored chunks.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query_embedding = state.embedder.embed_text(&request.query).await?;

    let results = state
        .store
        .read()
        .await
        .search(&query_embedding, request.top_k);

    info!(
        "Search returned {} results for query: {}",
        results.len(),
        request.query
    );

    Ok(Json(SearchResponse {
        results,
        query: request.query,
    }))
}

/// `POST /answer`: generate an answer from the question and retrieved
/// context, with sources derived from the forwarded search results.
pub async fn answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let prompt = build_prompt(&request.question, &request.context);

    let answer = state.generator.generate(&prompt).await?;

    let sources = match &request.search_results {
        Some(results) => results.iter().map(|r| r.source_label()).collect(),
        // No search results forwarded: attribute positionally.
        None => (0..request.context.len())
            .map(|i| format!("source_{}", i))
            .collect(),
    };

    info!("Generated answer for question: {}", request.question);

    Ok(Json(AnswerResponse {
        answer,
        sources,
        question: request.question,
    }))
}
