// ABOUTME: Anthropic messages-API provider with prompt caching support
// ABOUTME: Sends segmented prompts with cache_control hints and bounded timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Anthropic Provider
//!
//! Implementation of [`TextGenProvider`] for the Anthropic messages API.
//!
//! ## Configuration
//!
//! - `ANTHROPIC_API_KEY`: API key (required)
//! - `FORMA_AI_MODEL`: model override (optional)
//!
//! Cacheable prompt segments are sent as leading content blocks carrying
//! `cache_control: {"type": "ephemeral"}` so the static preamble (system
//! prompt, catalog, output schema) is billed once and read from cache on
//! subsequent calls.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CompletionRequest, CompletionResponse, TextGenProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the Anthropic API key
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the model
const MODEL_ENV: &str = "FORMA_AI_MODEL";

/// Default model to use
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Messages API endpoint
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Required API version header value
const API_VERSION: &str = "2023-06-01";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

/// One text block, optionally marked for provider-side caching
#[derive(Debug, Serialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<CacheControl>,
}

#[derive(Debug, Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    control_type: &'static str,
}

/// Messages API response body
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    model: String,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
    #[serde(default)]
    cache_read_input_tokens: u32,
    #[serde(default)]
    cache_creation_input_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

// ============================================================================
// Provider
// ============================================================================

/// Anthropic messages-API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl AnthropicProvider {
    /// Create a provider from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigMissing` error if `ANTHROPIC_API_KEY` is not set.
    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{API_KEY_ENV} environment variable is not set"),
            )
        })?;
        let model = env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        Ok(Self::new(api_key, model, timeout))
    }

    /// Create a provider with explicit credentials
    #[must_use]
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            timeout,
        }
    }

    /// Model this provider sends requests to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body(&self, request: &CompletionRequest) -> MessagesRequest {
        let content = request
            .segments
            .iter()
            .map(|segment| ContentBlock {
                block_type: "text",
                text: segment.text.clone(),
                cache_control: segment.cacheable.then_some(CacheControl {
                    control_type: "ephemeral",
                }),
            })
            .collect();

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content,
            }],
        }
    }

    fn map_transport_error(error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::timeout("anthropic").with_source(error)
        } else if error.is_connect() {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                "could not reach the text-generation service",
            )
            .with_source(error)
        } else {
            AppError::external_service("anthropic", error.to_string())
        }
    }

    fn map_status_error(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .map_or_else(|| body.chars().take(200).collect(), |error| error.message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::new(ErrorCode::ExternalAuthFailed, message)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::new(ErrorCode::ExternalRateLimited, message)
            }
            _ => AppError::external_service("anthropic", format!("{status}: {message}")),
        }
    }
}

#[async_trait]
impl TextGenProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        let body = self.build_body(request);
        debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt_chars(),
            "sending completion request"
        );

        let response = self
            .client
            .post(API_URL)
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(%status, "completion request failed");
            return Err(Self::map_status_error(status, &error_body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|err| AppError::external_service("anthropic", err.to_string()))?;

        let content = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        let usage = parsed.usage.map(|usage| TokenUsage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cache_read_input_tokens: usage.cache_read_input_tokens,
            cache_creation_input_tokens: usage.cache_creation_input_tokens,
        });

        if let Some(usage) = usage {
            info!(
                input = usage.input_tokens,
                output = usage.output_tokens,
                cache_read = usage.cache_read_input_tokens,
                cache_creation = usage.cache_creation_input_tokens,
                "completion usage"
            );
        }

        Ok(CompletionResponse {
            content,
            model: parsed.model,
            usage,
        })
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PromptSegment;

    #[test]
    fn test_cacheable_segments_carry_cache_control() {
        let provider = AnthropicProvider::new(
            "test-key".into(),
            DEFAULT_MODEL.into(),
            Duration::from_secs(30),
        );
        let request = CompletionRequest::new(
            vec![
                PromptSegment::cacheable("preamble"),
                PromptSegment::specific("suffix"),
            ],
            4000,
        );

        let body = provider.build_body(&request);
        let json = serde_json::to_value(&body).unwrap();
        let blocks = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["cache_control"]["type"], "ephemeral");
        assert!(blocks[1].get("cache_control").is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        let error = AnthropicProvider::map_status_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"rate limited"}}"#,
        );
        assert_eq!(error.code, ErrorCode::ExternalRateLimited);

        let error = AnthropicProvider::map_status_error(StatusCode::UNAUTHORIZED, "{}");
        assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    }
}
