// file: src/server/models.rs
// description: request and response bodies for the HTTP API
// reference: JSON marshalling via axum

use crate::models::{ChunkMetadata, SearchResult};
use serde::{Deserialize, Serialize};

fn default_top_k() -> usize {
    5
}

/// Request body for `POST /embed`. `texts` and `metadata` are parallel arrays
/// of equal length; omitted metadata defaults per position.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub texts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<ChunkMetadata>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub message: String,
    pub count: usize,
}

/// Request body for `POST /search`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query: String,
}

/// Request body for `POST /answer`. `context` carries the retrieved chunk
/// texts in rank order; `search_results` lets the answerer re-derive
/// attribution from metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HealthComponents,
    pub total_chunks: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthComponents {
    pub vector_store: bool,
    pub embedder: bool,
    pub llm_client: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_request_default_top_k() {
        let request: SearchRequest = serde_json::from_str(r#"{"query":"hello"}"#).unwrap();
        assert_eq!(request.top_k, 5);
    }

    #[test]
    fn test_answer_request_optional_search_results() {
        let request: AnswerRequest =
            serde_json::from_str(r#"{"question":"q","context":["a","b"]}"#).unwrap();
        assert!(request.search_results.is_none());
        assert_eq!(request.context.len(), 2);
    }
}
