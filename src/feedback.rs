// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Transcript feedback hand-off.
//!
//! After recognition, the transcript can be forwarded to a language model
//! for a response. [`FeedbackService`] is the collaborator contract;
//! [`OpenAiFeedbackService`] implements it against any OpenAI-compatible
//! chat-completions endpoint, with a system prompt loaded from a text
//! file and the transcript as the sole user message.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

/// Errors from the feedback side.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    /// The system prompt file could not be read.
    #[error("failed to load prompt: {0}")]
    Prompt(String),
    /// The HTTP request failed or returned a non-success status.
    #[error("feedback request failed: {0}")]
    Request(String),
    /// The endpoint answered with a body the client could not use.
    #[error("feedback response unusable: {0}")]
    Response(String),
}

/// Collaborator contract: turn a recognized transcript into a response.
#[async_trait]
pub trait FeedbackService: Send + Sync {
    async fn request(&self, transcript: &str) -> Result<String, FeedbackError>;
}

// ---------------------------------------------------------------------------
// Chat-completion wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenAiFeedbackService
// ---------------------------------------------------------------------------

/// [`FeedbackService`] over an OpenAI-compatible `/chat/completions`
/// endpoint (non-streaming).
pub struct OpenAiFeedbackService {
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: String,
    client: reqwest::Client,
}

impl OpenAiFeedbackService {
    /// Create a service with the system prompt read from `prompt_path`.
    pub async fn from_prompt_file(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        prompt_path: impl AsRef<Path>,
    ) -> Result<Self, FeedbackError> {
        let prompt_path = prompt_path.as_ref();
        let system_prompt = tokio::fs::read_to_string(prompt_path)
            .await
            .map_err(|e| FeedbackError::Prompt(format!("{}: {}", prompt_path.display(), e)))?;
        Ok(Self::new(api_key, base_url, model, system_prompt))
    }

    /// Create a service with the system prompt supplied directly.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            system_prompt: system_prompt.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl fmt::Debug for OpenAiFeedbackService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiFeedbackService")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt.len())
            .finish()
    }
}

#[async_trait]
impl FeedbackService for OpenAiFeedbackService {
    async fn request(&self, transcript: &str) -> Result<String, FeedbackError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.system_prompt},
                {"role": "user", "content": transcript},
            ],
            "stream": false,
        });
        debug!(url = %url, model = %self.model, "requesting feedback");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedbackError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body_text, "feedback API error");
            return Err(FeedbackError::Request(format!(
                "status {}: {}",
                status, body_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| FeedbackError::Response(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| FeedbackError::Response("no message content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response_extracts_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"raise to 15cm"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).expect("JSON");
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        assert_eq!(content.as_deref(), Some("raise to 15cm"));
    }

    #[test]
    fn test_completion_response_tolerates_empty_choices() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[]}"#).expect("JSON");
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_debug_omits_api_key() {
        let service =
            OpenAiFeedbackService::new("sk-secret", "https://api.example.com/v1", "m", "p");
        let rendered = format!("{:?}", service);
        assert!(rendered.contains("api.example.com"));
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = OpenAiFeedbackService::new("key", "https://api.example.com/v1/", "m", "p");
        assert_eq!(service.base_url, "https://api.example.com/v1");
    }

    #[tokio::test]
    async fn test_missing_prompt_file_is_prompt_error() {
        let err = OpenAiFeedbackService::from_prompt_file(
            "key",
            "https://api.example.com/v1",
            "m",
            "/nonexistent/Prompt.txt",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FeedbackError::Prompt(_)));
    }
}
