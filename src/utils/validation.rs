// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{RagError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RagError::Validation(format!("Invalid URL format: {}", url)));
        }
        Ok(())
    }

    pub fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(RagError::Validation("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(RagError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    /// Truncate to at most `max_length` characters, cutting on a char
    /// boundary so multibyte text never panics.
    pub fn truncate_text(text: &str, max_length: usize) -> String {
        match text.char_indices().nth(max_length) {
            Some((boundary, _)) => format!("{}...", &text[..boundary]),
            None => text.to_string(),
        }
    }
}
