// ABOUTME: Environment-driven configuration for the generation engine
// ABOUTME: Feature flags for prompt caching, phased generation, and catalog filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Engine Configuration
//!
//! Runtime configuration for the program generation engine, loaded from
//! environment variables with sensible defaults. The flags select which
//! generation strategy the orchestrator may use:
//!
//! - `FORMA_AI_PROMPT_CACHING` - reuse the static prompt preamble across calls
//! - `FORMA_AI_PHASED_GENERATION` - template week + progression matrix for
//!   programs of four weeks or more
//! - `FORMA_AI_FILTER_CATALOG` - bound the catalog sent to the generator
//! - `FORMA_AI_COMPRESSED_OUTPUT` - request the compact wire schema

use std::env;
use std::time::Duration;

use tracing::debug;

/// Environment variable enabling prompt caching
const ENV_PROMPT_CACHING: &str = "FORMA_AI_PROMPT_CACHING";
/// Environment variable enabling phased generation
const ENV_PHASED_GENERATION: &str = "FORMA_AI_PHASED_GENERATION";
/// Environment variable enabling catalog filtering
const ENV_FILTER_CATALOG: &str = "FORMA_AI_FILTER_CATALOG";
/// Environment variable enabling compressed output
const ENV_COMPRESSED_OUTPUT: &str = "FORMA_AI_COMPRESSED_OUTPUT";
/// Environment variable overriding the per-call timeout in seconds
const ENV_REQUEST_TIMEOUT: &str = "FORMA_AI_REQUEST_TIMEOUT_SECS";

/// Long requests need a generous ceiling; the generator streams slowly on
/// 60+ day programs
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Engine configuration resolved at startup
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reuse the cacheable prompt preamble across calls
    pub use_prompt_caching: bool,
    /// Generate template week + progression matrix instead of the full program
    pub use_phased_generation: bool,
    /// Bound the catalog passed to the generator
    pub use_filtered_catalog: bool,
    /// Request the compact wire schema from the generator
    pub use_compressed_output: bool,
    /// Per-call timeout for the external text-generation service
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_prompt_caching: true,
            use_phased_generation: true,
            use_filtered_catalog: true,
            use_compressed_output: true,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            use_prompt_caching: env_bool(ENV_PROMPT_CACHING, defaults.use_prompt_caching),
            use_phased_generation: env_bool(ENV_PHASED_GENERATION, defaults.use_phased_generation),
            use_filtered_catalog: env_bool(ENV_FILTER_CATALOG, defaults.use_filtered_catalog),
            use_compressed_output: env_bool(ENV_COMPRESSED_OUTPUT, defaults.use_compressed_output),
            request_timeout: Duration::from_secs(env_u64(
                ENV_REQUEST_TIMEOUT,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
        };
        debug!(
            prompt_caching = config.use_prompt_caching,
            phased = config.use_phased_generation,
            filtered_catalog = config.use_filtered_catalog,
            compressed_output = config.use_compressed_output,
            "engine configuration loaded"
        );
        config
    }
}

/// Parse a boolean environment variable, accepting `true`/`false`/`1`/`0`
fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

/// Parse a numeric environment variable
fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
