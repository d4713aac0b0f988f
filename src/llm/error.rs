//! Completion-API specific error handling.

use thiserror::Error;

/// Completion API specific errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// API key not found in environment variables or settings.
    #[error("OpenAI API key not found. Set the OPENAI_API_KEY environment variable")]
    ApiKeyNotFound,

    /// API request failed with error message.
    #[error("Completion API request failed: {0}")]
    RequestFailed(String),

    /// Invalid response format from the completion API.
    #[error("Invalid response format from completion API: {0}")]
    InvalidResponse(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    Network(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
