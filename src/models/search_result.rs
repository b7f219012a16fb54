// file: src/models/search_result.rs
// description: Search result model with similarity scores
// reference: Used for vector similarity search results

use crate::models::ChunkMetadata;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chunk text
    pub text: String,

    /// Metadata recorded when the chunk was embedded
    pub metadata: ChunkMetadata,

    /// Cosine similarity score (higher is more similar)
    pub score: f32,

    /// Position of the chunk in the store
    pub index: usize,
}

impl SearchResult {
    pub fn new(text: String, metadata: ChunkMetadata, score: f32, index: usize) -> Self {
        Self {
            text,
            metadata,
            score,
            index,
        }
    }

    /// Source label used for attribution in answers.
    pub fn source_label(&self) -> String {
        self.metadata.source_label(self.index)
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let preview = Validator::truncate_text(&self.text, max_content_len);

        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score,
            self.source_label(),
            preview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_result_creation() {
        let result = SearchResult::new(
            "Test content".to_string(),
            ChunkMetadata::with_source("file.md"),
            0.95,
            2,
        );

        assert_eq!(result.score, 0.95);
        assert_eq!(result.index, 2);
        assert_eq!(result.source_label(), "file.md");
    }

    #[test]
    fn test_source_label_without_source_metadata() {
        let result = SearchResult::new("text".to_string(), ChunkMetadata::default(), 0.5, 4);
        assert_eq!(result.source_label(), "document_4");
    }

    #[test]
    fn test_format_summary() {
        let result = SearchResult::new(
            "This is a very long content that will be truncated".to_string(),
            ChunkMetadata::with_source("docs/readme.md"),
            0.87,
            0,
        );

        let summary = result.format_summary(20);
        assert!(summary.contains("0.8700"));
        assert!(summary.contains("docs/readme.md"));
        assert!(summary.contains("..."));
    }

    #[test]
    fn test_format_summary_multibyte_text() {
        let result = SearchResult::new(
            "日本語のテキストです".to_string(),
            ChunkMetadata::with_source("ja.txt"),
            0.75,
            1,
        );

        let summary = result.format_summary(4);
        assert!(summary.contains("日本語の..."));
        assert!(summary.contains("ja.txt"));
    }
}
