// file: src/models/mod.rs
// description: core data model module exports
// reference: internal module structure

pub mod chunk;
pub mod metadata;
pub mod search_result;

pub use chunk::Chunk;
pub use metadata::ChunkMetadata;
pub use search_result::SearchResult;
