// file: src/models/chunk.rs
// description: stored chunk model pairing text, metadata and its embedding
// reference: internal data structures

use crate::models::ChunkMetadata;
use serde::{Deserialize, Serialize};

/// A unit of source text stored for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

impl Chunk {
    pub fn new(text: String, metadata: ChunkMetadata, embedding: Vec<f32>) -> Self {
        Self {
            text,
            metadata,
            embedding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(
            "ML is a subset of AI".to_string(),
            ChunkMetadata::with_source("doc1.txt"),
            vec![0.1, 0.2, 0.3],
        );

        assert_eq!(chunk.embedding.len(), 3);
        assert_eq!(chunk.metadata.source.as_deref(), Some("doc1.txt"));
    }
}
