// ABOUTME: Main library entry point for the Forma program generation engine
// ABOUTME: Generates periodized training programs through an external text-generation service

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

#![deny(unsafe_code)]

//! # Forma Engine
//!
//! Generation engine for periodized workout programs. One questionnaire
//! request plus a read-only exercise catalog goes in; a fully dated,
//! validated macrocycle comes out.
//!
//! ## Features
//!
//! - **Phased generation**: one template week plus a sparse progression
//!   matrix, expanded locally, for programs of four weeks or more
//! - **Prompt caching**: static preamble segments marked cacheable so the
//!   provider bills them once across calls
//! - **Compact wire schema**: single-letter response keys expanded locally
//!   to the canonical program model
//! - **Self-repair**: invalid exercise references are remapped against the
//!   catalog by name similarity instead of failing the request
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use forma_engine::config::EngineConfig;
//! use forma_engine::engine::GenerationOrchestrator;
//! use forma_engine::llm::AnthropicProvider;
//!
//! # async fn run(request: forma_engine::models::WorkoutRequest,
//! #              catalog: forma_engine::models::ExerciseCatalog)
//! #              -> forma_engine::errors::AppResult<()> {
//! let config = EngineConfig::from_env();
//! let provider = Arc::new(AnthropicProvider::from_env(config.request_timeout)?);
//! let orchestrator = GenerationOrchestrator::new(provider, config);
//!
//! let response = orchestrator.generate(&request, &catalog).await;
//! if response.success {
//!     println!("generated {} warnings", response.warnings.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Engine configuration loaded from environment variables
pub mod config;

/// Generation pipeline: filtering, decoding, expansion, validation, dates
pub mod engine;

/// Unified error type and error codes
pub mod errors;

/// Text-generation providers and prompt assembly
pub mod llm;

/// Structured logging initialization
pub mod logging;

/// Canonical program model, catalog, and request/response types
pub mod models;
