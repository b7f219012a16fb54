// file: src/embedding/mod.rs
// description: embedding provider trait and deterministic hash fallback
// reference: internal module structure

pub mod remote;

pub use remote::RemoteEmbeddingClient;

use crate::error::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Produces fixed-dimension vector representations of text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts, one vector per input,
    /// in input order.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_texts(&[text.to_string()]).await?;
        Ok(embeddings.pop().unwrap_or_default())
    }

    /// Dimension of the vectors this provider produces.
    fn dimension(&self) -> usize;
}

/// Deterministic embedder used when no embedding API key is configured.
///
/// Vectors are derived from SHA-256 digests of the input text, so identical
/// texts always map to identical unit vectors. Useful for local development
/// and tests; not a substitute for a real embedding model.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.dimension);
        let mut block: u64 = 0;

        while values.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(block.to_le_bytes());
            let digest = hasher.finalize();

            for byte in digest.iter() {
                if values.len() == self.dimension {
                    break;
                }
                values.push((*byte as f32 - 127.5) / 127.5);
            }

            block += 1;
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        values
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedder_dimension() {
        let embedder = HashEmbedder::new(384);
        let embedding = embedder.embed_text("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    async fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::new(128);
        let first = embedder.embed_text("same text").await.unwrap();
        let second = embedder.embed_text("same text").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_hash_embedder_distinguishes_texts() {
        let embedder = HashEmbedder::new(128);
        let a = embedder.embed_text("first").await.unwrap();
        let b = embedder.embed_text("second").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_hash_embedder_unit_norm() {
        let embedder = HashEmbedder::new(64);
        let embedding = embedder.embed_text("normalize me").await.unwrap();
        let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_embed_texts_preserves_order() {
        let embedder = HashEmbedder::new(32);
        let texts = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let embeddings = embedder.embed_texts(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[0], embeddings[2]);
        assert_ne!(embeddings[0], embeddings[1]);
    }
}
