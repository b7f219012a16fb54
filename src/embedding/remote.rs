// file: src/embedding/remote.rs
// description: OpenAI-compatible embeddings API client with batched requests
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::EmbeddingConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct RemoteEmbeddingClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    batch_size: usize,
    parallel_requests: usize,
}

impl RemoteEmbeddingClient {
    pub fn new(config: &EmbeddingConfig, api_key: String, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            dimension,
            batch_size: config.batch_size.max(1),
            parallel_requests: config.parallel_requests.max(1),
        }
    }

    async fn embed_batch(&self, batch: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = batch.len();
        let request = EmbeddingRequest {
            input: batch,
            model: self.model.clone(),
        };

        debug!("Requesting embeddings for batch of {}", expected);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Embedding(format!(
                "Embedding API request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.data.len() != expected {
            return Err(RagError::Embedding(format!(
                "Embedding API returned {} vectors for {} inputs",
                parsed.data.len(),
                expected
            )));
        }

        let embeddings: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();

        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(RagError::Embedding(format!(
                    "Embedding API returned dimension {}, expected {}",
                    embedding.len(),
                    self.dimension
                )));
            }
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingClient {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<Vec<String>> = texts
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        // `buffered` keeps batch order, so output vectors line up with inputs.
        let results: Vec<Result<Vec<Vec<f32>>>> = stream::iter(batches)
            .map(|batch| self.embed_batch(batch))
            .buffered(self.parallel_requests)
            .collect()
            .await;

        let mut embeddings = Vec::with_capacity(texts.len());
        for result in results {
            embeddings.extend(result?);
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
