// file: src/llm/client.rs
// description: LLM provider client for OpenAI and Anthropic chat APIs
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::config::LlmConfig;
use crate::error::{RagError, Result};
use crate::llm::AnswerGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn parse(provider: &str) -> Result<Self> {
        match provider.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(RagError::Config(format!(
                "Unsupported LLM provider: {}",
                other
            ))),
        }
    }
}

pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let provider = LlmProvider::parse(&config.provider)?;

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RagError::Config(format!("API key required for {}", config.provider))
            })?;

        Ok(Self {
            client: Client::new(),
            provider,
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [ChatMessage { role: "user", content: prompt.to_string() }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::Generation(format!("Failed to send OpenAI request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Generation(format!(
                "OpenAI request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| RagError::Generation(format!("Failed to parse OpenAI response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| RagError::Generation("OpenAI response contained no choices".to_string()))
    }

    async fn generate_anthropic(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [ChatMessage { role: "user", content: prompt.to_string() }],
        });

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                RagError::Generation(format!("Failed to send Anthropic request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Generation(format!(
                "Anthropic request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: AnthropicResponse = response.json().await.map_err(|e| {
            RagError::Generation(format!("Failed to parse Anthropic response: {}", e))
        })?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|content| content.text.trim().to_string())
            .ok_or_else(|| {
                RagError::Generation("Anthropic response contained no content".to_string())
            })
    }
}

#[async_trait]
impl AnswerGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Generating answer ({} prompt chars)", prompt.len());

        match self.provider {
            LlmProvider::OpenAi => self.generate_openai(prompt).await,
            LlmProvider::Anthropic => self.generate_anthropic(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: "gpt-4".to_string(),
            api_key: api_key.map(|k| k.to_string()),
            max_tokens: 1000,
            temperature: 0.1,
        }
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(LlmProvider::parse("openai").unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            LlmProvider::parse("Anthropic").unwrap(),
            LlmProvider::Anthropic
        );
        assert!(LlmProvider::parse("cohere").is_err());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        assert!(LlmClient::new(&config("openai", None)).is_err());
        assert!(LlmClient::new(&config("openai", Some("   "))).is_err());
    }

    #[test]
    fn test_client_with_api_key() {
        let client = LlmClient::new(&config("anthropic", Some("key"))).unwrap();
        assert_eq!(client.provider(), LlmProvider::Anthropic);
    }
}
