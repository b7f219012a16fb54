// file: src/client/mod.rs
// description: query client that sequences search then answer against the HTTP API
// reference: the embed → search → answer request/response cycle

use crate::models::SearchResult;
use crate::server::models::{
    AnswerRequest, AnswerResponse, EmbedRequest, EmbedResponse, HealthResponse, SearchRequest,
    SearchResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question";
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found";
pub const GENERIC_ERROR_MESSAGE: &str = "Request failed. Please try again.";

/// Errors surfaced to the user by the query client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Empty or whitespace-only input, rejected before any network call.
    #[error("{}", EMPTY_QUESTION_MESSAGE)]
    EmptyQuestion,

    /// Search succeeded but returned no matches; the answer call is skipped.
    #[error("{}", NO_RESULTS_MESSAGE)]
    NoResults,

    /// A network call failed. Carries the server's `detail` string when the
    /// response had one, otherwise the generic fallback message.
    #[error("{0}")]
    Request(String),
}

/// Extract the server-supplied error detail from a failed response body,
/// falling back to the generic message when the body has no `detail` string.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

/// HTTP client for the embed/search/answer endpoints.
#[derive(Clone)]
pub struct RagClient {
    http: Client,
    base_url: String,
    top_k: usize,
}

impl RagClient {
    pub fn new(base_url: impl Into<String>, top_k: usize) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: Client::new(),
            base_url,
            top_k,
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, QueryError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            debug!("Request to {} failed: {}", url, e);
            QueryError::Request(GENERIC_ERROR_MESSAGE.to_string())
        })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Request(extract_detail(&body)));
        }

        response.json::<R>().await.map_err(|e| {
            debug!("Failed to decode response from {}: {}", url, e);
            QueryError::Request(GENERIC_ERROR_MESSAGE.to_string())
        })
    }

    /// `POST /embed`
    pub async fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse, QueryError> {
        self.post_json("/embed", request).await
    }

    /// `POST /search` with the configured top_k.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, QueryError> {
        let request = SearchRequest {
            query: query.to_string(),
            top_k: self.top_k,
        };

        let response: SearchResponse = self.post_json("/search", &request).await?;
        Ok(response.results)
    }

    /// `POST /answer`. The context is the ordered `text` of every search
    /// result, and the raw results are forwarded so the answerer can
    /// re-derive attribution.
    pub async fn answer(
        &self,
        question: &str,
        results: &[SearchResult],
    ) -> Result<AnswerResponse, QueryError> {
        let request = AnswerRequest {
            question: question.to_string(),
            context: results.iter().map(|r| r.text.clone()).collect(),
            search_results: Some(results.to_vec()),
        };

        self.post_json("/answer", &request).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, QueryError> {
        let url = format!("{}/health", self.base_url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            debug!("Request to {} failed: {}", url, e);
            QueryError::Request(GENERIC_ERROR_MESSAGE.to_string())
        })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Request(extract_detail(&body)));
        }

        response
            .json()
            .await
            .map_err(|_| QueryError::Request(GENERIC_ERROR_MESSAGE.to_string()))
    }

    /// The full query cycle: validate, search, halt on an empty result set,
    /// then answer. Exactly two sequential network calls on the happy path.
    pub async fn ask(&self, question: &str) -> Result<AnswerResponse, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        let results = self.search(question).await?;
        if results.is_empty() {
            return Err(QueryError::NoResults);
        }

        self.answer(question, &results).await
    }
}

/// Display phase of a query session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Searching,
    Answering,
    Done,
    Failed,
}

impl QueryPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, QueryPhase::Searching | QueryPhase::Answering)
    }
}

/// Stateful wrapper over [`RagClient`] tracking what a UI would display:
/// the current phase, the latest answer with its sources, or an error
/// message. Each submission clears the previous outcome first; submissions
/// while a request is in flight are ignored, so no concurrent duplicates are
/// issued and a stale response can never overwrite a newer one.
pub struct QuerySession {
    client: RagClient,
    phase: QueryPhase,
    answer: Option<AnswerResponse>,
    error: Option<String>,
}

impl QuerySession {
    pub fn new(client: RagClient) -> Self {
        Self {
            client,
            phase: QueryPhase::Idle,
            answer: None,
            error: None,
        }
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn answer(&self) -> Option<&AnswerResponse> {
        self.answer.as_ref()
    }

    pub fn sources(&self) -> &[String] {
        self.answer.as_ref().map(|a| a.sources.as_slice()).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit a question. No-op while a previous submission is in flight.
    pub async fn submit(&mut self, input: &str) {
        if self.phase.is_in_flight() {
            return;
        }

        self.answer = None;
        self.error = None;

        let question = input.trim().to_string();
        if question.is_empty() {
            self.fail(QueryError::EmptyQuestion);
            return;
        }

        self.phase = QueryPhase::Searching;
        let results = match self.client.search(&question).await {
            Ok(results) => results,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        if results.is_empty() {
            self.fail(QueryError::NoResults);
            return;
        }

        self.phase = QueryPhase::Answering;
        match self.client.answer(&question, &results).await {
            Ok(response) => {
                self.answer = Some(response);
                self.phase = QueryPhase::Done;
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: QueryError) {
        self.error = Some(err.to_string());
        self.phase = QueryPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_detail_from_structured_body() {
        assert_eq!(extract_detail(r#"{"detail":"index unavailable"}"#), "index unavailable");
    }

    #[test]
    fn test_extract_detail_fallback_on_plain_body() {
        assert_eq!(extract_detail("gateway timeout"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_detail(""), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_extract_detail_fallback_on_non_string_detail() {
        assert_eq!(extract_detail(r#"{"detail":{"code":500}}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = RagClient::new("http://localhost:8000/", 5);
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(QueryError::EmptyQuestion.to_string(), "Please enter a question");
        assert_eq!(QueryError::NoResults.to_string(), "No relevant documents found");
    }

    #[tokio::test]
    async fn test_empty_question_rejected_without_network_call() {
        // The base URL is unroutable; an attempted request would surface the
        // generic error, so a local validation error proves no call was made.
        let client = RagClient::new("http://127.0.0.1:1", 5);

        let result = client.ask("   ").await;
        assert_eq!(result.unwrap_err(), QueryError::EmptyQuestion);

        let mut session = QuerySession::new(client);
        session.submit("\t  \n").await;
        assert_eq!(session.phase(), QueryPhase::Failed);
        assert_eq!(session.error(), Some(EMPTY_QUESTION_MESSAGE));
        assert!(session.answer().is_none());
    }

    #[tokio::test]
    async fn test_submit_ignored_while_in_flight() {
        let client = RagClient::new("http://127.0.0.1:1", 5);
        let mut session = QuerySession::new(client);
        session.phase = QueryPhase::Searching;

        // An unroutable base URL would flip the session to Failed if a
        // request were attempted; the phase staying put proves the no-op.
        session.submit("What is machine learning?").await;

        assert_eq!(session.phase(), QueryPhase::Searching);
        assert!(session.error().is_none());
        assert!(session.answer().is_none());
    }
}
