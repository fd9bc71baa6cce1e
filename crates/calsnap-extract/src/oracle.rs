//! Chat-completions client for the extraction oracle.
//!
//! This module provides a low-level HTTP client for an OpenAI-compatible
//! chat-completions endpoint (OpenRouter by default), handling request
//! assembly, authentication, and response parsing.
//!
//! The client speaks one request shape: a system instruction plus a single
//! user message whose content is either plain text (with the current date
//! prepended for relative-date resolution) or a text-part/image-part pair
//! carrying a base64 data URI. `response_format` is pinned to
//! `json_object` so the model is at least nudged toward parseable output.
//!
//! [`CompletionTransport`] is the seam the retry loop is written against;
//! tests substitute a scripted transport for the real HTTP client.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::prompts::InstructionProfile;

/// Default chat-completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default per-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// Token-usage counters reported by the oracle.
///
/// Forwarded to the caller unmodified; the pipeline itself never
/// interprets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens produced by the completion.
    pub completion_tokens: u64,
    /// Total billed tokens.
    pub total_tokens: u64,
}

/// The payload handed to the oracle for one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OraclePayload {
    /// A base64-encoded image data URI (`data:image/png;base64,...`).
    Image { data_uri: String },
    /// A natural-language schedule description.
    Text { content: String },
}

impl OraclePayload {
    /// Returns the instruction profile matching this payload kind.
    pub fn profile(&self) -> InstructionProfile {
        match self {
            Self::Image { .. } => InstructionProfile::ImageExtraction,
            Self::Text { .. } => InstructionProfile::TextExtraction,
        }
    }
}

/// One completion request: model, payload, and the date used to anchor
/// relative expressions like "tomorrow".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Provider model identifier.
    pub model: String,
    /// The image or text payload.
    pub payload: OraclePayload,
    /// The caller's current date.
    pub today: NaiveDate,
}

/// Raw text plus usage counters from one successful oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The message content; expected (not guaranteed) to be JSON.
    pub content: String,
    /// Token usage, when the provider reports it.
    pub usage: Option<Usage>,
}

/// A boxed future for transport methods, keeping the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The transport seam between the retry loop and the network.
///
/// The production implementation is [`OracleClient`]. Tests provide
/// scripted transports that fail in controlled ways.
pub trait CompletionTransport: Send + Sync {
    /// Performs a single completion attempt.
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, ExtractResult<Completion>>;
}

// --- wire format -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// HTTP client for the completion oracle.
#[derive(Debug)]
pub struct OracleClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OracleClient {
    /// Creates a client for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is empty or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> ExtractResult<Self> {
        Self::with_endpoint(api_key, DEFAULT_COMPLETIONS_URL)
    }

    /// Creates a client for a custom endpoint.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> ExtractResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExtractError::configuration("API key is empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                ExtractError::configuration("failed to build HTTP client").with_source(e)
            })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Assembles the `messages` array for a request.
    fn build_messages(request: &CompletionRequest) -> Value {
        let system_prompt = request.payload.profile().system_prompt();
        let user_content = match &request.payload {
            OraclePayload::Image { data_uri } => json!([
                { "type": "text", "text": "Extract events from this schedule." },
                { "type": "image_url", "image_url": { "url": data_uri } },
            ]),
            OraclePayload::Text { content } => Value::String(format!(
                "Current Date: {}\n\nExtract events from this message:\n\"{}\"",
                request.today.format("%Y-%m-%d"),
                content
            )),
        };

        json!([
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user_content },
        ])
    }

    async fn complete_inner(&self, request: CompletionRequest) -> ExtractResult<Completion> {
        let body = json!({
            "model": request.model,
            "messages": Self::build_messages(&request),
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractError::network("completion request failed").with_source(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractError::server(format!(
                "oracle returned HTTP {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ExtractError::server("failed to decode oracle response").with_source(e))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ExtractError::empty_content("no content received from oracle"))?;

        debug!(
            content_len = content.len(),
            usage = ?completion.usage,
            "oracle completion received"
        );

        Ok(Completion {
            content,
            usage: completion.usage,
        })
    }
}

impl CompletionTransport for OracleClient {
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, ExtractResult<Completion>> {
        Box::pin(self.complete_inner(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_empty_api_key() {
        let err = OracleClient::new("  ").unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ExtractErrorCode::ConfigurationError
        );
    }

    #[test]
    fn image_messages_carry_data_uri_part() {
        let request = CompletionRequest {
            model: "qwen/qwen3-vl-235b-a22b-instruct".into(),
            payload: OraclePayload::Image {
                data_uri: "data:image/png;base64,AAAA".into(),
            },
            today: date(2025, 3, 1),
        };

        let messages = OracleClient::build_messages(&request);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"][1]["type"], "image_url");
        assert_eq!(
            messages[1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn text_messages_anchor_current_date() {
        let request = CompletionRequest {
            model: "m".into(),
            payload: OraclePayload::Text {
                content: "lunch with Ana tomorrow at noon".into(),
            },
            today: date(2025, 3, 1),
        };

        let messages = OracleClient::build_messages(&request);
        let user = messages[1]["content"].as_str().unwrap();
        assert!(user.starts_with("Current Date: 2025-03-01"));
        assert!(user.contains("lunch with Ana tomorrow"));
    }

    #[test]
    fn payload_selects_profile() {
        let image = OraclePayload::Image {
            data_uri: "data:image/jpeg;base64,AA".into(),
        };
        let text = OraclePayload::Text {
            content: "x".into(),
        };
        assert_eq!(image.profile(), InstructionProfile::ImageExtraction);
        assert_eq!(text.profile(), InstructionProfile::TextExtraction);
    }

    #[test]
    fn usage_deserializes_from_wire() {
        let usage: Usage = serde_json::from_str(
            r#"{"prompt_tokens":812,"completion_tokens":144,"total_tokens":956}"#,
        )
        .unwrap();
        assert_eq!(usage.prompt_tokens, 812);
        assert_eq!(usage.total_tokens, 956);
    }
}
