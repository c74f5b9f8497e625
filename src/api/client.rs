//! Blocking client for OpenAI-compatible chat, model, and image endpoints.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder};
use tracing::debug;

use crate::api::models::sort_models;
use crate::api::{ChatRequest, ChatResponse, ImageRequest, ImageResponse, ModelsResponse};
use crate::core::message::{Message, ROLE_ASSISTANT};
use crate::utils::url::construct_api_url;

/// The chat-completion service a session talks to.
///
/// Every call is a single attempt; failures are returned, never retried.
pub trait ChatBackend: Send {
    /// Send the full history and return the assistant's reply.
    fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, ApiError>;

    fn list_models(&self) -> Result<Vec<String>, ApiError>;
}

#[derive(Debug)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS, body decode).
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Status { status: u16, summary: String },
    /// A successful response without the expected payload.
    EmptyResponse(&'static str),
    Decode(base64::DecodeError),
    /// No backend is configured, e.g. because no API token was found.
    Unconfigured(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "request failed: {err}"),
            ApiError::Status { status, summary } => {
                write!(f, "API request failed with status {status}: {summary}")
            }
            ApiError::EmptyResponse(what) => write!(f, "API response contained no {what}"),
            ApiError::Decode(err) => write!(f, "invalid base64 image data: {err}"),
            ApiError::Unconfigured(reason) => write!(f, "no chat backend available: {reason}"),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Http(err) => Some(err),
            ApiError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Generate `n` images and return the decoded bytes of each.
    pub fn generate_images(
        &self,
        prompt: &str,
        size: &str,
        n: u8,
    ) -> Result<Vec<Vec<u8>>, ApiError> {
        let body = ImageRequest {
            prompt,
            n,
            size,
            response_format: "b64_json",
        };
        let response: ImageResponse = self
            .send(self.post("images/generations").json(&body))?
            .json()?;

        let images = response
            .data
            .into_iter()
            .filter_map(|image| image.b64_json)
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(ApiError::Decode)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if images.is_empty() {
            return Err(ApiError::EmptyResponse("image data"));
        }
        Ok(images)
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.http
            .post(construct_api_url(&self.base_url, endpoint))
            .bearer_auth(&self.api_key)
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.http
            .get(construct_api_url(&self.base_url, endpoint))
            .bearer_auth(&self.api_key)
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, ApiError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        debug!(status = status.as_u16(), "API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            summary: summarize_error_body(&error_text),
        })
    }
}

impl ChatBackend for OpenAiClient {
    fn complete(&self, model: &str, messages: &[Message]) -> Result<Message, ApiError> {
        let body = ChatRequest {
            model,
            messages,
            stream: false,
        };
        debug!(model, messages = messages.len(), "sending chat completion");
        let response: ChatResponse = self.send(self.post("chat/completions").json(&body))?.json()?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ApiError::EmptyResponse("choices"))?;
        let role = choice
            .message
            .role
            .unwrap_or_else(|| ROLE_ASSISTANT.to_string());
        Ok(Message {
            role,
            content: choice.message.content.unwrap_or_default(),
        })
    }

    fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let mut response: ModelsResponse = self.send(self.get("models"))?.json()?;
        sort_models(&mut response.data);
        Ok(response.data.into_iter().map(|model| model.id).collect())
    }
}

/// Stand-in backend used when the session starts without credentials, so
/// local commands keep working and remote ones fail with the reason.
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ChatBackend for UnconfiguredBackend {
    fn complete(&self, _model: &str, _messages: &[Message]) -> Result<Message, ApiError> {
        Err(ApiError::Unconfigured(self.reason.clone()))
    }

    fn list_models(&self) -> Result<Vec<String>, ApiError> {
        Err(ApiError::Unconfigured(self.reason.clone()))
    }
}

/// Pull a one-line summary out of an API error body, falling back to the
/// trimmed body itself.
pub(crate) fn summarize_error_body(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .or_else(|| {
                    value
                        .get("error")
                        .and_then(|v| v.as_str().map(str::to_owned))
                })
                .or_else(|| {
                    value
                        .get("message")
                        .and_then(|v| v.as_str().map(str::to_owned))
                })
        });

    match summary {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => trimmed.to_string(),
    }
}
