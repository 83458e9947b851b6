//! Augmentation client — the single point of entry for all generative text
//! calls in the matching service.
//!
//! ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
//! The assessor depends on the `AugmentationClient` trait, never on the
//! concrete HTTP adapter, so tests can substitute a stub.
//!
//! The collaborator is treated as untrusted: possibly slow, possibly down,
//! possibly returning malformed output. Callers own the fallback behavior;
//! this module only reports failure as `AugmentationError`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all augmentation calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;

/// System instruction sent with every assessment prompt. JSON-only output is
/// enforced here so the interpreter has the best possible starting point.
const SYSTEM_INSTRUCTION: &str =
    "You are a recruitment analyst producing candidate-to-vacancy compatibility \
    assessments. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

#[derive(Debug, Error)]
pub enum AugmentationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Augmentation returned empty content")]
    EmptyContent,
}

/// Boundary trait for the generative collaborator.
///
/// `generate` sends one prompt and returns the raw response text. No JSON
/// guarantee is made at this seam — interpretation happens downstream.
#[async_trait]
pub trait AugmentationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AugmentationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// Text of the first text block, if any.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic adapter
// ────────────────────────────────────────────────────────────────────────────

/// Production augmentation client backed by the Anthropic Messages API.
/// Retries 429 and 5xx responses with exponential backoff.
#[derive(Clone)]
pub struct AnthropicAugmentor {
    client: Client,
    api_key: String,
}

impl AnthropicAugmentor {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl AugmentationClient for AnthropicAugmentor {
    async fn generate(&self, prompt: &str) -> Result<String, AugmentationError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_INSTRUCTION,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<AugmentationError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "augmentation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AugmentationError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("augmentation API returned {}: {}", status, body);
                last_error = Some(AugmentationError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(AugmentationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: MessagesResponse =
                response.json().await.map_err(AugmentationError::Http)?;

            debug!(
                "augmentation call succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            return match parsed.text() {
                Some(text) => Ok(text.to_string()),
                None => Err(AugmentationError::EmptyContent),
            };
        }

        Err(last_error.unwrap_or(AugmentationError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response = MessagesResponse {
            content: vec![
                ContentBlock {
                    block_type: "thinking".to_string(),
                    text: None,
                },
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("{\"percentage\": 50}".to_string()),
                },
            ],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };
        assert_eq!(response.text(), Some("{\"percentage\": 50}"));
    }

    #[test]
    fn test_response_without_text_block_yields_none() {
        let response = MessagesResponse {
            content: vec![],
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
            },
        };
        assert!(response.text().is_none());
    }

    #[test]
    fn test_error_envelope_deserializes() {
        let body = r#"{"error": {"type": "overloaded_error", "message": "Overloaded"}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.message, "Overloaded");
    }

    #[test]
    fn test_augmentation_error_display() {
        let err = AugmentationError::Api {
            status: 529,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 529): overloaded");
    }
}
