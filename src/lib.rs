// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod client;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;
pub mod utils;

pub use client::{QueryError, QueryPhase, QuerySession, RagClient};
pub use config::{ClientConfig, Config, EmbeddingConfig, LlmConfig, ServerConfig, StoreConfig};
pub use embedding::{EmbeddingProvider, HashEmbedder, RemoteEmbeddingClient};
pub use error::{RagError, Result};
pub use llm::{build_prompt, AnswerGenerator, LlmClient, LlmProvider};
pub use models::{Chunk, ChunkMetadata, SearchResult};
pub use server::models::{AnswerResponse, EmbedRequest, SearchRequest};
pub use server::{create_router, AppState};
pub use store::{StoreStats, VectorStore};
pub use utils::Validator;
