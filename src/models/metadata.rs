// file: src/models/metadata.rs
// description: chunk metadata as a closed record with an opaque extension map
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata attached to a stored chunk.
///
/// The well-known fields cover what source attribution needs; anything else a
/// caller sends is preserved round-trip in the flattened extension map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ChunkMetadata {
    /// Metadata with only a source label set.
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Default metadata for the chunk at `position` within an embed request.
    pub fn default_for_position(position: usize) -> Self {
        Self::with_source(format!("doc_{}", position))
    }

    /// Source label used for attribution, falling back to the chunk's
    /// store-wide index when no source was recorded.
    pub fn source_label(&self, index: usize) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| format!("document_{}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_label_prefers_source_field() {
        let metadata = ChunkMetadata::with_source("notes.txt");
        assert_eq!(metadata.source_label(3), "notes.txt");
    }

    #[test]
    fn test_source_label_falls_back_to_index() {
        let metadata = ChunkMetadata::default();
        assert_eq!(metadata.source_label(7), "document_7");
    }

    #[test]
    fn test_extension_fields_round_trip() {
        let json = r#"{"source":"a.md","page":4,"lang":"en"}"#;
        let metadata: ChunkMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(metadata.source.as_deref(), Some("a.md"));
        assert_eq!(metadata.extra.get("page"), Some(&serde_json::json!(4)));

        let back = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back["page"], serde_json::json!(4));
        assert_eq!(back["lang"], serde_json::json!("en"));
    }

    #[test]
    fn test_default_for_position() {
        assert_eq!(
            ChunkMetadata::default_for_position(2).source.as_deref(),
            Some("doc_2")
        );
    }
}
