// ABOUTME: Strategy selection and sequencing for program generation
// ABOUTME: Runs the external calls, then hands payloads through the local pipeline stages

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Generation Orchestrator
//!
//! Sequences one generation request end to end. Three strategies, picked in
//! order of preference from the configuration:
//!
//! 1. **Phased** - template week + progression matrix, expanded locally.
//!    Used for programs of four weeks or more; saves most output tokens.
//! 2. **Cached** - one call with a cacheable preamble and a specific suffix.
//! 3. **Direct** - one uncached call, the fallback.
//!
//! The orchestrator only sequences and budgets; payload repair belongs to
//! the mapper and content checks to the validator. Failures come back as a
//! failed [`WorkoutResponse`] with a caller-presentable message, never as a
//! panic or a raw transport error.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::catalog_filter::CatalogFilter;
use crate::engine::decoder::decode_payload;
use crate::engine::progression::{ProgressionExpander, ProgressionMatrix};
use crate::engine::scheduler::DateScheduler;
use crate::engine::schema::{self, CanonicalPayload};
use crate::engine::validator::{ExerciseMapper, Validator};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{prompts, CompletionRequest, TextGenProvider};
use crate::models::{
    CatalogExercise, ExerciseCatalog, Macrocycle, ProgramExplanation, WorkoutRequest,
    WorkoutResponse,
};

/// Base output-token allowance covering structure and explanation
const TOKEN_BUDGET_BASE: u32 = 8000;
/// Output tokens estimated per generated training day
const TOKENS_PER_DAY: u32 = 800;
/// Hard ceiling on the output-token budget
const TOKEN_BUDGET_CAP: u32 = 64_000;
/// Output budget for the base-week call (one week only)
const BASE_WEEK_MAX_TOKENS: u32 = 4000;
/// Output budget for the progression-matrix call (deltas only)
const PROGRESSION_MAX_TOKENS: u32 = 2000;
/// Minimum program length for the phased strategy
const PHASED_MIN_WEEKS: u32 = 4;

/// Strategy chosen for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Template week + progression matrix, expanded locally
    Phased,
    /// Single call with a cacheable preamble
    Cached,
    /// Single uncached call
    Direct,
}

/// End-to-end generation pipeline driver
pub struct GenerationOrchestrator {
    provider: Arc<dyn TextGenProvider>,
    config: EngineConfig,
    filter: CatalogFilter,
}

impl GenerationOrchestrator {
    /// Create an orchestrator over one provider and configuration
    #[must_use]
    pub fn new(provider: Arc<dyn TextGenProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            config,
            filter: CatalogFilter::default(),
        }
    }

    /// Strategy this configuration selects for a request
    #[must_use]
    pub fn strategy_for(&self, request: &WorkoutRequest) -> GenerationStrategy {
        if self.config.use_prompt_caching {
            if self.config.use_phased_generation
                && request.program_duration.total_weeks >= PHASED_MIN_WEEKS
            {
                GenerationStrategy::Phased
            } else {
                GenerationStrategy::Cached
            }
        } else {
            GenerationStrategy::Direct
        }
    }

    /// Output-token budget for a single-call generation
    #[must_use]
    pub fn max_output_tokens(request: &WorkoutRequest) -> u32 {
        let weeks = request.program_duration.total_weeks;
        let days = request.availability.days_per_week;
        (TOKEN_BUDGET_BASE + weeks * days * TOKENS_PER_DAY).min(TOKEN_BUDGET_CAP)
    }

    /// Generate a complete program for one request.
    ///
    /// Never returns an error: failures surface as a failed
    /// [`WorkoutResponse`] with a caller-presentable message.
    pub async fn generate(
        &self,
        request: &WorkoutRequest,
        catalog: &ExerciseCatalog,
    ) -> WorkoutResponse {
        match self.run(request, catalog).await {
            Ok(response) => response,
            Err(error) => {
                warn!(code = ?error.code, message = %error.message, "generation failed");
                WorkoutResponse::failure(present_error(&error))
            }
        }
    }

    /// One-week preview generation for fast questionnaire feedback
    pub async fn generate_preview(
        &self,
        request: &WorkoutRequest,
        catalog: &ExerciseCatalog,
    ) -> WorkoutResponse {
        self.generate(&request.preview(), catalog).await
    }

    async fn run(
        &self,
        request: &WorkoutRequest,
        catalog: &ExerciseCatalog,
    ) -> AppResult<WorkoutResponse> {
        let candidates: Vec<&CatalogExercise> = if self.config.use_filtered_catalog {
            self.filter.filter(catalog, request)
        } else {
            catalog.exercises().iter().collect()
        };

        let strategy = self.strategy_for(request);
        info!(
            ?strategy,
            weeks = request.program_duration.total_weeks,
            candidates = candidates.len(),
            provider = self.provider.name(),
            "starting generation"
        );

        let (program, explanation) = match strategy {
            GenerationStrategy::Phased => self.run_phased(request, &candidates).await?,
            GenerationStrategy::Cached => {
                let segments = prompts::assemble_optimized(
                    request,
                    &candidates,
                    self.config.use_compressed_output,
                );
                self.run_single(request, segments).await?
            }
            GenerationStrategy::Direct => {
                let segments = prompts::assemble_direct(
                    request,
                    &candidates,
                    self.config.use_compressed_output,
                );
                self.run_single(request, segments).await?
            }
        };

        self.finalize(program, explanation, request, catalog)
    }

    /// Single-call strategies: one completion, decode, expand
    async fn run_single(
        &self,
        request: &WorkoutRequest,
        segments: Vec<crate::llm::PromptSegment>,
    ) -> AppResult<(Macrocycle, Option<ProgramExplanation>)> {
        let completion = CompletionRequest::new(segments, Self::max_output_tokens(request));
        let response = self.provider.complete(&completion).await?;
        let payload = decode_payload(&response.content)?;
        let CanonicalPayload {
            macrocycle,
            explanation,
        } = schema::expand(&payload)?;
        Ok((macrocycle, explanation))
    }

    /// Phased strategy: base week, then progression matrix, then local
    /// expansion. An unparsable matrix degrades to the default wave instead
    /// of failing the request.
    async fn run_phased(
        &self,
        request: &WorkoutRequest,
        candidates: &[&CatalogExercise],
    ) -> AppResult<(Macrocycle, Option<ProgramExplanation>)> {
        let total_weeks = request.program_duration.total_weeks;

        info!(total_weeks, "phase 1: generating base week");
        let base_segments = prompts::assemble_base_week(request, candidates);
        let base_completion = CompletionRequest::new(base_segments, BASE_WEEK_MAX_TOKENS);
        let base_response = self.provider.complete(&base_completion).await?;
        let base_payload = decode_payload(&base_response.content)
            .map_err(|err| err.with_details(serde_json::json!({"phase": "base_week"})))?;
        let template = schema::extract_template_week(&base_payload)?;

        info!(total_weeks, "phase 2: generating progression matrix");
        let progression_segments =
            prompts::assemble_progression(candidates, &base_payload, total_weeks);
        let progression_completion =
            CompletionRequest::new(progression_segments, PROGRESSION_MAX_TOKENS);
        let matrix = match self.provider.complete(&progression_completion).await {
            Ok(response) => parse_matrix(&response.content).unwrap_or_else(|| {
                warn!("progression matrix unusable, falling back to default wave");
                ProgressionMatrix::default_wave(
                    total_weeks,
                    request.program_duration.include_deload,
                )
            }),
            Err(error) => {
                warn!(code = ?error.code, "progression call failed, using default wave");
                ProgressionMatrix::default_wave(
                    total_weeks,
                    request.program_duration.include_deload,
                )
            }
        };

        info!("phase 3: expanding full program");
        let program = ProgressionExpander::expand(&template, &matrix, request);
        let explanation = synthesized_explanation(request);
        Ok((program, Some(explanation)))
    }

    /// Shared tail: structural checks, warnings, reference repair, dates
    fn finalize(
        &self,
        mut program: Macrocycle,
        explanation: Option<ProgramExplanation>,
        request: &WorkoutRequest,
        catalog: &ExerciseCatalog,
    ) -> AppResult<WorkoutResponse> {
        program.validate_structure()?;

        let mut warnings =
            Validator::validate(&program, catalog, request.user_profile.fitness_level);

        let mut mapper = ExerciseMapper::new(catalog);
        mapper.repair_program(&mut program);
        if !mapper.unmapped().is_empty() {
            warnings.push(format!(
                "Could not map these exercises to the catalog: {}",
                mapper.unmapped().join(", ")
            ));
        }

        DateScheduler::schedule(
            &mut program,
            request.program_duration.start_date,
            request.program_duration.mesocycle_weeks,
        );

        info!(
            mesocycles = program.mesocycles.len(),
            warnings = warnings.len(),
            repaired = mapper.repaired_count(),
            "generation complete"
        );
        Ok(WorkoutResponse::success(program, explanation, warnings))
    }
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

/// Decode and deserialize a progression matrix, `None` on any failure
fn parse_matrix(raw: &str) -> Option<ProgressionMatrix> {
    let value: Value = decode_payload(raw).ok()?;
    serde_json::from_value(value).ok()
}

/// Explanation synthesized for phased generations, where the generator never
/// produces one
fn synthesized_explanation(request: &WorkoutRequest) -> ProgramExplanation {
    ProgramExplanation {
        rationale: format!(
            "{}-week program designed for {}",
            request.program_duration.total_weeks, request.goals.primary_goal
        ),
        progression_strategy:
            "Undulating progression with gradual volume and intensity increases".to_owned(),
        deload_strategy: request.program_duration.include_deload.then(|| {
            "Deload weeks every 3-4 weeks to consolidate recovery".to_owned()
        }),
        volume_distribution: Some(format!(
            "Balanced distribution across {} sessions per week",
            request.availability.days_per_week
        )),
        tips: vec![
            "Log your working weights to verify progression".to_owned(),
            "Respect the prescribed rest periods".to_owned(),
            "Adjust loads by perceived effort (RIR)".to_owned(),
        ],
    }
}

/// Shape an internal error into the message shown to the requesting user
fn present_error(error: &AppError) -> String {
    match error.code {
        ErrorCode::ExternalTimeout => {
            "Generation took too long. Try a shorter program.".to_owned()
        }
        ErrorCode::ExternalAuthFailed => {
            "Authentication failed against the generation service. Contact the administrator."
                .to_owned()
        }
        ErrorCode::ExternalRateLimited => {
            "Request limit exceeded. Wait a few minutes and try again.".to_owned()
        }
        ErrorCode::GenerationDecodeFailed => {
            "The generation response could not be parsed.".to_owned()
        }
        ErrorCode::ValueOutOfRange | ErrorCode::MissingRequiredField => {
            format!("Validation error: {}", error.message)
        }
        _ => format!("Generation error: {}", error.message),
    }
}
