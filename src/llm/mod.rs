// file: src/llm/mod.rs
// description: answer generation trait and prompt construction
// reference: internal module structure

pub mod client;

pub use client::{LlmClient, LlmProvider};

use crate::error::Result;
use async_trait::async_trait;

/// Generates free-text answers from a fully rendered prompt.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Render the answer prompt from a question and retrieved context chunks.
pub fn build_prompt(question: &str, context: &[String]) -> String {
    let context = context.join("\n\n");

    format!(
        "Based on the following context, answer the question. If the context doesn't contain enough information to answer the question, say so.\n\nContext:\n{}\n\nQuestion: {}\n\nAnswer:",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_prompt_joins_context_with_blank_lines() {
        let context = vec!["ML is...".to_string(), "It involves...".to_string()];
        let prompt = build_prompt("What is machine learning?", &context);

        assert!(prompt.contains("Context:\nML is...\n\nIt involves..."));
        assert!(prompt.contains("Question: What is machine learning?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_build_prompt_empty_context() {
        let prompt = build_prompt("anything?", &[]);
        assert!(prompt.contains("Context:\n\nQuestion: anything?"));
    }
}
