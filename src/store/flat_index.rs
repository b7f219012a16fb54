// file: src/store/flat_index.rs
// description: flat exact-search vector store with JSON persistence
// reference: inner-product search over L2-normalized vectors

use crate::error::{RagError, Result};
use crate::models::{Chunk, ChunkMetadata, SearchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Flat exact-search index over L2-normalized vectors.
///
/// Inner product over normalized vectors is cosine similarity, so every
/// stored embedding and every query is normalized on the way in.
pub struct VectorStore {
    dimension: usize,
    chunks: Vec<Chunk>,
    index_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub dimension: usize,
    pub index_path: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    dimension: usize,
    chunks: Vec<Chunk>,
}

impl VectorStore {
    /// Store with no persistence, for tests and ephemeral use.
    pub fn in_memory(dimension: usize) -> Self {
        Self {
            dimension,
            chunks: Vec::new(),
            index_path: None,
        }
    }

    /// Open a store backed by `<index_path>.json`, loading existing chunks
    /// when the file is present. A corrupt index file is replaced with an
    /// empty index rather than failing startup.
    pub fn open(index_path: &Path, dimension: usize) -> Result<Self> {
        if let Some(parent) = index_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = Self::index_file(index_path);
        let chunks = if file.exists() {
            match Self::load_chunks(&file, dimension) {
                Ok(chunks) => {
                    info!("Loaded existing index with {} chunks", chunks.len());
                    chunks
                }
                Err(e) => {
                    warn!("Failed to load existing index: {}. Creating new index.", e);
                    Vec::new()
                }
            }
        } else {
            info!("Created new index with dimension {}", dimension);
            Vec::new()
        };

        Ok(Self {
            dimension,
            chunks,
            index_path: Some(index_path.to_path_buf()),
        })
    }

    fn index_file(index_path: &Path) -> PathBuf {
        let mut file = index_path.as_os_str().to_owned();
        file.push(".json");
        PathBuf::from(file)
    }

    fn load_chunks(file: &Path, dimension: usize) -> Result<Vec<Chunk>> {
        let data = fs::read_to_string(file)?;
        let persisted: PersistedIndex = serde_json::from_str(&data)?;

        if persisted.dimension != dimension {
            return Err(RagError::Store(format!(
                "Index dimension {} does not match configured dimension {}",
                persisted.dimension, dimension
            )));
        }

        Ok(persisted.chunks)
    }

    /// Add chunks with their embeddings. `texts`, `embeddings` and (when
    /// given) `metadata` are parallel arrays; positions without metadata get
    /// a default `doc_{i}` source label.
    pub fn add_chunks(
        &mut self,
        texts: Vec<String>,
        embeddings: Vec<Vec<f32>>,
        metadata: Option<Vec<ChunkMetadata>>,
    ) -> Result<usize> {
        if texts.len() != embeddings.len() {
            return Err(RagError::Validation(
                "Number of texts must match number of embeddings".to_string(),
            ));
        }

        if let Some(ref metadata) = metadata {
            if metadata.len() != texts.len() {
                return Err(RagError::Validation(
                    "Number of metadata items must match number of texts".to_string(),
                ));
            }
        }

        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(RagError::Validation(format!(
                    "Embedding dimension {} does not match index dimension {}",
                    embedding.len(),
                    self.dimension
                )));
            }
        }

        let count = texts.len();
        let metadata = metadata
            .unwrap_or_else(|| (0..count).map(ChunkMetadata::default_for_position).collect());

        for ((text, mut embedding), meta) in texts.into_iter().zip(embeddings).zip(metadata) {
            normalize(&mut embedding);
            self.chunks.push(Chunk::new(text, meta, embedding));
        }

        self.save()?;

        info!("Added {} chunks to vector store", count);
        Ok(count)
    }

    /// Top-k cosine similarity search. An empty index yields an empty result
    /// set; `top_k` is capped at the number of stored chunks.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        if self.chunks.is_empty() {
            return Vec::new();
        }

        let mut query = query_embedding.to_vec();
        normalize(&mut query);

        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| (index, dot(&query, &chunk.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k.min(self.chunks.len()))
            .map(|(index, score)| {
                let chunk = &self.chunks[index];
                SearchResult::new(chunk.text.clone(), chunk.metadata.clone(), score, index)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_chunks: self.chunks.len(),
            dimension: self.dimension,
            index_path: self
                .index_path
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }

    /// Drop all chunks and persist the empty index.
    pub fn clear(&mut self) -> Result<()> {
        self.chunks.clear();
        self.save()?;
        info!("Cleared all chunks from vector store");
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let Some(ref index_path) = self.index_path else {
            return Ok(());
        };

        let persisted = PersistedIndex {
            dimension: self.dimension,
            chunks: self.chunks.clone(),
        };

        let file = Self::index_file(index_path);
        let data = serde_json::to_string(&persisted)?;
        fs::write(&file, data)?;

        Ok(())
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_with_chunks() -> VectorStore {
        let mut store = VectorStore::in_memory(3);
        store
            .add_chunks(
                vec![
                    "alpha".to_string(),
                    "beta".to_string(),
                    "gamma".to_string(),
                ],
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                None,
            )
            .unwrap();
        store
    }

    #[test]
    fn test_empty_index_returns_no_results() {
        let store = VectorStore::in_memory(3);
        assert!(store.search(&[1.0, 0.0, 0.0], 5).is_empty());
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let store = store_with_chunks();
        let results = store.search(&[0.9, 0.1, 0.0], 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "alpha");
        assert_eq!(results[0].index, 0);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_top_k_capped_at_store_size() {
        let store = store_with_chunks();
        let results = store.search(&[1.0, 1.0, 1.0], 10);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_default_metadata_assigned_per_position() {
        let store = store_with_chunks();
        let results = store.search(&[0.0, 1.0, 0.0], 1);
        assert_eq!(results[0].metadata.source.as_deref(), Some("doc_1"));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut store = VectorStore::in_memory(3);

        let result = store.add_chunks(
            vec!["one".to_string(), "two".to_string()],
            vec![vec![1.0, 0.0, 0.0]],
            None,
        );
        assert!(result.is_err());

        let result = store.add_chunks(
            vec!["one".to_string()],
            vec![vec![1.0, 0.0, 0.0]],
            Some(vec![ChunkMetadata::default(), ChunkMetadata::default()]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let mut store = VectorStore::in_memory(3);
        let result = store.add_chunks(vec!["one".to_string()], vec![vec![1.0, 0.0]], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_persistence_round_trip() {
        let temp = TempDir::new().unwrap();
        let index_path = temp.path().join("index");

        {
            let mut store = VectorStore::open(&index_path, 3).unwrap();
            store
                .add_chunks(
                    vec!["persisted".to_string()],
                    vec![vec![0.5, 0.5, 0.0]],
                    Some(vec![ChunkMetadata::with_source("kept.txt")]),
                )
                .unwrap();
        }

        let reloaded = VectorStore::open(&index_path, 3).unwrap();
        assert_eq!(reloaded.len(), 1);

        let results = reloaded.search(&[0.5, 0.5, 0.0], 1);
        assert_eq!(results[0].text, "persisted");
        assert_eq!(results[0].metadata.source.as_deref(), Some("kept.txt"));
    }

    #[test]
    fn test_dimension_mismatch_on_load() {
        let temp = TempDir::new().unwrap();
        let index_path = temp.path().join("index");

        {
            let mut store = VectorStore::open(&index_path, 3).unwrap();
            store
                .add_chunks(vec!["one".to_string()], vec![vec![1.0, 0.0, 0.0]], None)
                .unwrap();
        }

        // Mismatched dimension falls back to a fresh empty index.
        let reloaded = VectorStore::open(&index_path, 4).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_stats() {
        let temp = TempDir::new().unwrap();
        let index_path = temp.path().join("index");

        let mut store = VectorStore::open(&index_path, 3).unwrap();
        store
            .add_chunks(vec!["one".to_string()], vec![vec![1.0, 0.0, 0.0]], None)
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_chunks, 1);
        assert_eq!(stats.dimension, 3);
        assert!(stats.index_path.unwrap().ends_with("index"));
    }

    #[test]
    fn test_clear() {
        let mut store = store_with_chunks();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store.search(&[1.0, 0.0, 0.0], 5).is_empty());
    }
}
