// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{RagError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub index_path: PathBuf,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub batch_size: usize,
    pub parallel_requests: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub top_k: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RAG")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| RagError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            store: StoreConfig {
                index_path: PathBuf::from("data/rag_index"),
                dimension: 384,
            },
            embedding: EmbeddingConfig {
                api_key: None,
                api_url: "https://api.openai.com/v1/embeddings".to_string(),
                model: "text-embedding-3-small".to_string(),
                batch_size: 64,
                parallel_requests: 4,
            },
            llm: LlmConfig {
                provider: "openai".to_string(),
                model: "gpt-4".to_string(),
                api_key: None,
                max_tokens: 1000,
                temperature: 0.1,
            },
            client: ClientConfig {
                api_url: "http://127.0.0.1:8000".to_string(),
                top_k: 5,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_port(self.server.port)?;
        Validator::validate_url(&self.embedding.api_url)?;
        Validator::validate_url(&self.client.api_url)?;

        if self.store.dimension == 0 {
            return Err(RagError::Config(
                "store dimension must be greater than 0".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(RagError::Config(
                "embedding batch_size must be greater than 0".to_string(),
            ));
        }

        if self.embedding.parallel_requests == 0 {
            return Err(RagError::Config(
                "embedding parallel_requests must be greater than 0".to_string(),
            ));
        }

        if self.client.top_k == 0 {
            return Err(RagError::Config(
                "client top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = Config::default_config();
        config.store.dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default_config();
        config.client.top_k = 0;
        assert!(config.validate().is_err());
    }
}
