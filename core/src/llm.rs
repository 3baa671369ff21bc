//! Generative backend seam. The complaint handler only depends on the
//! [`ReplyGenerator`] capability; [`OllamaClient`] is the production
//! implementation against a local Ollama server.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "gemma2:2b";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to generative backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generative backend returned an empty reply")]
    EmptyReply,
}

/// Capability the complaint handler needs from a conversational model.
///
/// Implementations must surface failure: an empty or whitespace-only reply
/// is an error, never a degenerate success, so the handler can apply its
/// fallback policy.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f64,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama server's `/api/chat` endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// The timeout bounds the only potentially slow step in the pipeline;
    /// there are no retries. Fails if the HTTP client cannot be built,
    /// rather than falling back to a client without the timeout.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ReplyGenerator for OllamaClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            stream: false,
            options: ChatOptions { temperature },
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = response.message.content.trim().to_string();
        if reply.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::{
        ChatMessage, ChatOptions, ChatRequest, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, OllamaClient,
    };

    #[test]
    fn client_builds_with_timeout() {
        let client = OllamaClient::new(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn chat_request_matches_ollama_wire_shape() {
        let request = ChatRequest {
            model: "gemma2:2b",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be kind",
                },
                ChatMessage {
                    role: "user",
                    content: "the train was late",
                },
            ],
            stream: false,
            options: ChatOptions { temperature: 0.7 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gemma2:2b",
                "messages": [
                    {"role": "system", "content": "be kind"},
                    {"role": "user", "content": "the train was late"},
                ],
                "stream": false,
                "options": {"temperature": 0.7},
            })
        );
    }
}
