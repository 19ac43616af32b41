// ABOUTME: Structural extraction of a JSON payload from raw generator output
// ABOUTME: Tries direct parse, fenced code block, then outermost brace span
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Response Decoder
//!
//! Extracts one JSON payload from the unstructured text the generator
//! returns. Three strategies are tried in order, first success wins:
//!
//! 1. parse the entire text as JSON
//! 2. parse the span inside a fenced code block
//! 3. parse the span between the first `{` and the last `}`
//!
//! No semantic validation happens here; the schema expander owns that.

use serde_json::Value;
use tracing::{debug, error};

use crate::errors::{AppError, AppResult};

/// Decode one JSON payload from raw generator output.
///
/// # Errors
///
/// Returns `GenerationDecodeFailed` when no strategy yields parseable JSON.
pub fn decode_payload(raw: &str) -> AppResult<Value> {
    debug!(chars = raw.len(), "decoding generator output");

    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    if let Some(span) = fenced_span(raw) {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => {
                debug!(chars = span.len(), "payload extracted from fenced block");
                return Ok(value);
            }
            Err(err) => debug!(%err, "fenced block did not parse"),
        }
    }

    if let Some(span) = brace_span(raw) {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => {
                debug!(chars = span.len(), "payload extracted from brace span");
                return Ok(value);
            }
            Err(err) => debug!(%err, "brace span did not parse"),
        }
    }

    error!(
        head = raw.chars().take(200).collect::<String>(),
        "no parseable payload in generator output"
    );
    Err(AppError::decode_failed(
        "generator output contained no parseable payload",
    ))
}

/// Span between fence markers, preferring a ```json fence. An unterminated
/// fence extends to the end of the text.
fn fenced_span(raw: &str) -> Option<&str> {
    let open = raw.find("```json").map(|idx| idx + 7).or_else(|| {
        raw.find("```").map(|idx| idx + 3)
    })?;
    let rest = &raw[open..];
    let span = rest.find("```").map_or(rest, |close| &rest[..close]);
    Some(span.trim())
}

/// Span from the first `{` to the last `}` inclusive
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
