// ABOUTME: End-to-end tests for the generation pipeline over a scripted provider
// ABOUTME: Covers phased and single-call strategies, repair, scheduling, and failures

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use forma_engine::config::EngineConfig;
use forma_engine::engine::GenerationOrchestrator;
use forma_engine::models::IntensityLevel;

use common::{
    base_week_json, init_test_logging, progression_json, sample_catalog, sample_request,
    ScriptedProvider,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Single-call compact payload with one valid and one broken reference
fn single_call_json(first_id: &str, first_name: &str) -> String {
    serde_json::json!({
        "m": {
            "n": "Short Program",
            "o": "hypertrophy",
            "ms": [{
                "b": 1,
                "mc": [{
                    "w": 1,
                    "i": "low",
                    "td": [{
                        "d": 1, "n": "Full Body", "f": "Chest and legs", "r": false,
                        "ex": [
                            {"id": first_id, "n": first_name, "s": 3, "rm": 8, "rx": 12},
                            {"id": "ex-2", "n": "Barbell Squat", "s": 3, "rm": 6, "rx": 10}
                        ]
                    }]
                }]
            }]
        },
        "e": {"r": "Dense full-body work", "p": "Linear weekly load increases", "t": ["Warm up first"]}
    })
    .to_string()
}

#[tokio::test]
async fn test_phased_generation_end_to_end() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![
        &base_week_json(),
        &progression_json(),
    ]));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), EngineConfig::default());

    let response = orchestrator
        .generate(&sample_request(), &sample_catalog())
        .await;

    assert!(response.success, "error: {:?}", response.error);
    let program = response.macrocycle.expect("program");

    // 8 weeks in 4-week blocks
    assert_eq!(program.mesocycles.len(), 2);
    assert_eq!(program.mesocycles[0].microcycles.len(), 4);
    assert_eq!(program.mesocycles[0].focus, "Accumulation");

    // Week 2 carries the explicit set bump, week 1 keeps template values
    let week1 = &program.mesocycles[0].microcycles[0];
    let week2 = &program.mesocycles[0].microcycles[1];
    assert_eq!(week1.intensity_level, IntensityLevel::Low);
    assert_eq!(week1.training_days[0].exercises[0].sets, 4);
    assert_eq!(week2.training_days[0].exercises[0].sets, 5);

    // Week 4 deload: sets 4 -> 2, RIR 2 -> 4
    let week4 = &program.mesocycles[0].microcycles[3];
    assert_eq!(week4.intensity_level, IntensityLevel::Deload);
    assert_eq!(week4.training_days[0].exercises[0].sets, 2);
    assert_eq!(week4.training_days[0].exercises[0].effort.effort_value, 4);

    // Dates tile in 7-day microcycles from the start date
    assert_eq!(program.start_date, Some(date(2025, 6, 2)));
    assert_eq!(week1.start_date, Some(date(2025, 6, 2)));
    assert_eq!(week1.end_date, Some(date(2025, 6, 8)));
    assert_eq!(week2.start_date, Some(date(2025, 6, 9)));
    assert_eq!(
        week1.training_days[1].date,
        Some(date(2025, 6, 5)) // day_number 4
    );
    assert_eq!(program.end_date, Some(date(2025, 7, 27)));

    // Phased mode synthesizes an explanation
    let explanation = response.explanation.expect("explanation");
    assert!(explanation.rationale.contains("8-week"));

    // Two calls: base week (4000 tokens) then progression (2000 tokens),
    // sharing a byte-identical cacheable preamble
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].max_tokens, 4000);
    assert_eq!(requests[1].max_tokens, 2000);
    assert!(requests[0].segments[0].cacheable);
    assert_eq!(requests[0].segments[0].text, requests[1].segments[0].text);
}

#[tokio::test]
async fn test_short_program_uses_one_cached_call() {
    init_test_logging();
    let fenced = format!(
        "Here is your program:\n```json\n{}\n```",
        single_call_json("ex-1", "Barbell Bench Press")
    );
    let provider = Arc::new(ScriptedProvider::new(vec![&fenced]));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), EngineConfig::default());

    let mut request = sample_request();
    request.program_duration.total_weeks = 2;
    request.program_duration.mesocycle_weeks = 2;

    let response = orchestrator.generate(&request, &sample_catalog()).await;
    assert!(response.success, "error: {:?}", response.error);

    // One call, budget 8000 + 2 weeks * 2 days * 800
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].max_tokens, 11_200);
    assert!(requests[0].segments[0].cacheable);

    // Explanation comes from the payload in single-call mode
    let explanation = response.explanation.expect("explanation");
    assert_eq!(explanation.rationale, "Dense full-body work");
    assert!(response.warnings.is_empty());
}

#[tokio::test]
async fn test_invalid_reference_is_repaired_and_warned() {
    init_test_logging();
    let payload = single_call_json("ghost-1", "Bench Press");
    let provider = Arc::new(ScriptedProvider::new(vec![&payload]));
    let orchestrator = GenerationOrchestrator::new(provider, EngineConfig::default());

    let mut request = sample_request();
    request.program_duration.total_weeks = 2;
    request.program_duration.mesocycle_weeks = 2;

    let response = orchestrator.generate(&request, &sample_catalog()).await;
    assert!(response.success, "error: {:?}", response.error);

    // Validator saw the broken reference before the mapper fixed it
    assert!(response.warnings.iter().any(|w| w.contains("Bench Press")));

    let program = response.macrocycle.expect("program");
    let exercise = &program.mesocycles[0].microcycles[0].training_days[0].exercises[0];
    assert_eq!(exercise.exercise_id, "ex-1");
    assert_eq!(exercise.exercise_name, "Barbell Bench Press");
}

#[tokio::test]
async fn test_unparsable_response_fails_with_presentable_error() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![
        "Sorry, I cannot produce a program today.",
    ]));
    let orchestrator = GenerationOrchestrator::new(provider, EngineConfig::default());

    let mut request = sample_request();
    request.program_duration.total_weeks = 2;

    let response = orchestrator.generate(&request, &sample_catalog()).await;
    assert!(!response.success);
    assert!(response.macrocycle.is_none());
    assert!(response
        .error
        .expect("error message")
        .contains("could not be parsed"));
}

#[tokio::test]
async fn test_preview_generates_a_single_week() {
    init_test_logging();
    let payload = single_call_json("ex-1", "Barbell Bench Press");
    let provider = Arc::new(ScriptedProvider::new(vec![&payload]));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), EngineConfig::default());

    let response = orchestrator
        .generate_preview(&sample_request(), &sample_catalog())
        .await;
    assert!(response.success, "error: {:?}", response.error);

    // The preview collapses to one week, so one cached call is enough
    assert_eq!(provider.requests().len(), 1);
    let program = response.macrocycle.expect("program");
    let total_weeks: usize = program
        .mesocycles
        .iter()
        .map(|meso| meso.microcycles.len())
        .sum();
    assert_eq!(total_weeks, 1);
}

#[tokio::test]
async fn test_failed_progression_call_degrades_to_default_wave() {
    init_test_logging();
    // Second response is prose, not a matrix; the engine must fall back
    let provider = Arc::new(ScriptedProvider::new(vec![
        &base_week_json(),
        "I cannot compute the progression right now.",
    ]));
    let orchestrator = GenerationOrchestrator::new(provider, EngineConfig::default());

    let response = orchestrator
        .generate(&sample_request(), &sample_catalog())
        .await;
    assert!(response.success, "error: {:?}", response.error);

    let program = response.macrocycle.expect("program");
    // Default wave: low, medium, high, deload
    let intensities: Vec<IntensityLevel> = program.mesocycles[0]
        .microcycles
        .iter()
        .map(|micro| micro.intensity_level)
        .collect();
    assert_eq!(
        intensities,
        vec![
            IntensityLevel::Low,
            IntensityLevel::Medium,
            IntensityLevel::High,
            IntensityLevel::Deload
        ]
    );
}
