// file: src/store/mod.rs
// description: vector store module exports
// reference: internal module structure

pub mod flat_index;

pub use flat_index::{StoreStats, VectorStore};
