// ABOUTME: Text-generation provider abstraction for the program generation engine
// ABOUTME: Defines the provider contract, prompt segments with cache hints, and token usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Text-Generation Provider Service Provider Interface
//!
//! Contract the external text-generation service must satisfy to plug into
//! the generation engine. A request is a sequence of text segments, the
//! leading one typically cacheable (system prompt + catalog + output schema)
//! followed by a request-specific suffix; the response is unstructured text
//! expected to contain one JSON-like payload.
//!
//! ## Key Concepts
//!
//! - [`PromptSegment`]: one text block, flagged cacheable or not
//! - [`CompletionRequest`]: segments plus an output-token budget
//! - [`TextGenProvider`]: async trait implemented by concrete providers and
//!   by test doubles

mod anthropic;
pub mod prompts;

pub use anthropic::AnthropicProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One text block of a prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSegment {
    /// Segment text
    pub text: String,
    /// Whether the provider may cache this segment across calls
    pub cacheable: bool,
}

impl PromptSegment {
    /// Create a cacheable segment (static preamble)
    #[must_use]
    pub fn cacheable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cacheable: true,
        }
    }

    /// Create a request-specific segment
    #[must_use]
    pub fn specific(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cacheable: false,
        }
    }
}

/// One call to the text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Ordered prompt segments, cacheable ones first
    pub segments: Vec<PromptSegment>,
    /// Output-token budget for this call
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request from segments and a token budget
    #[must_use]
    pub const fn new(segments: Vec<PromptSegment>, max_tokens: u32) -> Self {
        Self {
            segments,
            max_tokens,
        }
    }

    /// Total prompt length in characters, for logging
    #[must_use]
    pub fn prompt_chars(&self) -> usize {
        self.segments.iter().map(|segment| segment.text.len()).sum()
    }
}

/// Token usage statistics for one call
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub input_tokens: u32,
    /// Tokens produced in the response
    pub output_tokens: u32,
    /// Prompt tokens served from the provider cache
    #[serde(default)]
    pub cache_read_input_tokens: u32,
    /// Prompt tokens written to the provider cache
    #[serde(default)]
    pub cache_creation_input_tokens: u32,
}

/// Raw response from the text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unstructured response text, expected to contain one payload
    pub content: String,
    /// Model that produced the response
    pub model: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Contract for external text-generation providers.
///
/// Implementations must be `Send + Sync`; the engine issues calls
/// sequentially within one request but independent requests run concurrently
/// against a shared provider.
#[async_trait]
pub trait TextGenProvider: Send + Sync {
    /// Internal provider name (lowercase identifier)
    fn name(&self) -> &'static str;

    /// Perform one bounded completion call.
    ///
    /// # Errors
    ///
    /// Returns `ExternalTimeout` when the per-call deadline passes and
    /// `ExternalServiceError` for transport or API failures. Dropping the
    /// returned future abandons the in-flight call.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_segment_constructors() {
        let preamble = PromptSegment::cacheable("system prompt");
        assert!(preamble.cacheable);
        let suffix = PromptSegment::specific("user context");
        assert!(!suffix.cacheable);
    }

    #[test]
    fn test_prompt_chars_sums_segments() {
        let request = CompletionRequest::new(
            vec![
                PromptSegment::cacheable("abcd"),
                PromptSegment::specific("efg"),
            ],
            1000,
        );
        assert_eq!(request.prompt_chars(), 7);
    }
}
