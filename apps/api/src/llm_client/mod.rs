/// LLM Client — the single point of entry for all generation-endpoint calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation endpoint directly.
/// All LLM interactions MUST go through `CompletionBackend`.
///
/// Model: deepseek-chat (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "deepseek-chat";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a (system, user) instruction pair into one text completion.
///
/// `LlmClient` is the production backend; tests substitute canned completions.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first completion, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Chat-completions client holding the bearer credential server-side.
///
/// Exactly one outbound request per call: no retries, no caching.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
        })
    }

    /// Makes one call to the endpoint, returning the full response object.
    /// Any non-success status is a hard failure.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Reduces raw completion text to the JSON object it is supposed to contain.
///
/// Removes ```` ``` ```` / ```` ```json ```` fence markers and `<think>…</think>`
/// reasoning blocks, then slices from the first `{` to the last `}` so leading or
/// trailing commentary is dropped. Returns `None` when no brace pair survives.
pub fn extract_json_object(text: &str) -> Option<String> {
    let without_fences = text.replace("```json", "").replace("```", "");
    let cleaned = strip_reasoning(&without_fences);

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }
    Some(cleaned[start..=end].to_string())
}

/// Drops every `<think>…</think>` span. An unterminated block swallows the rest of the text.
fn strip_reasoning(text: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        match rest[open..].find(CLOSE) {
            Some(close) => rest = &rest[open + close + CLOSE.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_object(input).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_without_fence_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_object(input).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(extract_json_object(input).unwrap(), input);
    }

    #[test]
    fn test_extract_json_drops_reasoning_and_commentary() {
        let input = "<think>the user wants {json}</think>Sure! Here it is:\n{\"a\": {\"b\": 1}}\nHope this helps.";
        assert_eq!(extract_json_object(input).unwrap(), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_json_multiple_reasoning_blocks() {
        let input = "<think>one</think>{\"a\": 1}<think>two }</think>";
        assert_eq!(extract_json_object(input).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_without_braces_is_none() {
        assert!(extract_json_object("I cannot help with that.").is_none());
        assert!(extract_json_object("} reversed {").is_none());
    }

    #[test]
    fn test_chat_response_text_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}],"usage":{"prompt_tokens":3,"completion_tokens":1}}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), Some("{}"));
    }

    #[test]
    fn test_chat_response_blank_content_is_none() {
        let body = r#"{"choices":[{"message":{"content":"  "}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(response.text().is_none());
    }
}
