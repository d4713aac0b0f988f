//! OpenAI-compatible completion client for commit message improvement.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::llm::error::CompletionError;
use crate::llm::{prompts, truncate::truncate_diff};

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat API request message.
#[derive(Serialize, Debug)]
struct Message {
    role: String,
    content: String,
}

/// Chat API request body.
#[derive(Serialize, Debug)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

/// Chat API response choice.
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// Chat API response message.
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

/// Chat API response.
#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

/// Completion client for commit message improvement.
///
/// Constructed once at startup from the resolved API key and passed down
/// to whichever component needs it; there is no global credential state.
pub struct CompletionClient {
    /// HTTP client for API requests.
    client: Client,
    /// API key for bearer authentication.
    api_key: String,
    /// Model identifier.
    model: String,
    /// Base URL for the API.
    base_url: String,
    /// Maximum diff length in characters before truncation.
    max_diff_chars: usize,
}

impl CompletionClient {
    /// Creates a new completion client.
    pub fn new(
        model: String,
        api_key: String,
        base_url: Option<String>,
        max_diff_chars: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_diff_chars,
        }
    }

    /// Builds the full chat completions URL.
    fn api_url(&self) -> String {
        let mut base = self.base_url.clone();
        if base.ends_with('/') {
            base.pop();
        }
        format!("{base}/v1/chat/completions")
    }

    /// Generates a replacement commit message from a diff and the current
    /// message.
    ///
    /// The diff is truncated to the configured budget before it is embedded
    /// in the prompt. Returns the first completion choice's text verbatim,
    /// untrimmed. Failures are not retried.
    pub async fn improve_message(&self, diff: &str, current_message: &str) -> Result<String> {
        let truncated_diff = truncate_diff(diff, self.max_diff_chars);

        debug!(
            diff_len = diff.len(),
            truncated_len = truncated_diff.len(),
            model = %self.model,
            "Preparing completion request"
        );

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompts::user_prompt(current_message, &truncated_diff),
                },
            ],
            stream: false,
        };

        let api_url = self.api_url();
        info!(url = %api_url, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(
                CompletionError::RequestFailed(format!("HTTP {status}: {error_text}")).into(),
            );
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("No choices in response".to_string()).into())
    }
}
