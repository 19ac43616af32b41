// ABOUTME: Program generation pipeline modules
// ABOUTME: Catalog filtering, payload decoding, schema expansion, progression, validation, dates

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Generation Engine
//!
//! The pipeline that turns one questionnaire request into a complete
//! training program:
//!
//! ```text
//! Orchestrator -> CatalogFilter -> (external call) -> decoder -> schema
//!              -> [ProgressionExpander if phased] -> Validator/ExerciseMapper
//!              -> DateScheduler -> WorkoutResponse
//! ```
//!
//! Every stage after the external call is a pure transformation over
//! in-memory structures; nothing engine-owned outlives a request.

pub mod catalog_filter;
pub mod decoder;
pub mod orchestrator;
pub mod progression;
pub mod scheduler;
pub mod schema;
pub mod validator;

pub use catalog_filter::CatalogFilter;
pub use orchestrator::{GenerationOrchestrator, GenerationStrategy};
pub use progression::{ProgressionExpander, ProgressionMatrix};
pub use scheduler::DateScheduler;
pub use validator::{ExerciseMapper, Validator};
