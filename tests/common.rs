// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scripted provider double, sample catalog, and sample requests

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code, clippy::missing_panics_doc, clippy::must_use_candidate)]

//! Shared test utilities for `forma_engine` integration tests.

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use chrono::NaiveDate;
use forma_engine::errors::AppError;
use forma_engine::llm::{CompletionRequest, CompletionResponse, TextGenProvider, TokenUsage};
use forma_engine::models::{
    Availability, CatalogExercise, Difficulty, EquipmentAccess, EquipmentType, ExerciseCatalog,
    FitnessLevel, MuscleGroup, PrimaryGoal, ProgramDuration, TrainingGoals, UserProfile,
    WorkoutRequest,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Provider double that replays scripted responses in order and records
/// every request it receives
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::internal("scripted provider ran out of responses"))?;
        Ok(CompletionResponse {
            content,
            model: "scripted-model".into(),
            usage: Some(TokenUsage::default()),
        })
    }
}

fn entry(
    id: &str,
    name: &str,
    class: &str,
    muscles: &[&str],
    equipment: &str,
) -> CatalogExercise {
    CatalogExercise {
        id: id.into(),
        name: name.into(),
        movement_class: class.into(),
        primary_muscles: muscles.iter().map(|&m| m.into()).collect(),
        secondary_muscles: Vec::new(),
        equipment: equipment.into(),
        difficulty: Difficulty::Intermediate,
        cardio_subclass: None,
    }
}

/// Small catalog covering the movement classes the engine cares about
pub fn sample_catalog() -> ExerciseCatalog {
    ExerciseCatalog::new(vec![
        entry("ex-1", "Barbell Bench Press", "multiarticular", &["chest"], "barbell"),
        entry("ex-2", "Barbell Squat", "multiarticular", &["legs"], "barbell"),
        entry("ex-3", "Barbell Row", "multiarticular", &["back"], "barbell"),
        entry("ex-4", "Overhead Press", "multiarticular", &["shoulders"], "barbell"),
        entry("ex-5", "Dumbbell Curl", "monoarticular", &["arms"], "dumbbells"),
        entry("ex-6", "Stationary Bike", "cardio", &["legs"], "bodyweight"),
    ])
}

/// Standard 8-week intermediate hypertrophy request
pub fn sample_request() -> WorkoutRequest {
    WorkoutRequest {
        user_profile: UserProfile {
            fitness_level: FitnessLevel::Intermediate,
            age: Some(30),
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            training_experience_months: Some(24),
        },
        goals: TrainingGoals {
            primary_goal: PrimaryGoal::Hypertrophy,
            specific_goals: Vec::new(),
            target_muscle_groups: vec![MuscleGroup::Chest, MuscleGroup::Back],
        },
        availability: Availability {
            days_per_week: 2,
            session_duration_minutes: 60,
        },
        equipment: EquipmentAccess {
            has_gym_access: true,
            available_equipment: vec![EquipmentType::Barbell, EquipmentType::Dumbbells],
        },
        restrictions: None,
        preferences: None,
        program_duration: ProgramDuration {
            total_weeks: 8,
            mesocycle_weeks: 4,
            include_deload: true,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        },
    }
}

/// Compact base-week payload matching [`sample_catalog`] ids
pub fn base_week_json() -> String {
    serde_json::json!({
        "m": {
            "n": "Hypertrophy Base",
            "d": "Upper/lower base week",
            "o": "hypertrophy",
            "ms": [{
                "b": 1,
                "n": "Phase 1",
                "f": "Accumulation",
                "mc": [{
                    "w": 1,
                    "i": "low",
                    "td": [
                        {
                            "d": 1, "n": "Upper", "f": "Chest and back", "r": false,
                            "ex": [
                                {"id": "ex-1", "n": "Barbell Bench Press", "s": 4, "rm": 8, "rx": 12, "rs": 90, "et": "RIR", "ev": 2},
                                {"id": "ex-3", "n": "Barbell Row", "s": 3, "rm": 8, "rx": 12, "rs": 90, "et": "RIR", "ev": 2}
                            ]
                        },
                        {
                            "d": 4, "n": "Lower", "f": "Legs", "r": false,
                            "ex": [
                                {"id": "ex-2", "n": "Barbell Squat", "s": 4, "rm": 6, "rx": 10, "rs": 120, "et": "RIR", "ev": 2}
                            ]
                        },
                        {"d": 7, "n": "Rest", "f": "Recovery", "r": true, "ex": []}
                    ]
                }]
            }]
        }
    })
    .to_string()
}

/// Progression matrix marking week 4 as deload with one explicit change
pub fn progression_json() -> String {
    serde_json::json!({
        "progression": [
            {"week": 2, "intensity": "medium", "changes": [
                {"day": 1, "ex_idx": 0, "s": 5}
            ]},
            {"week": 3, "intensity": "high", "changes": []}
        ],
        "deload_weeks": [4, 8]
    })
    .to_string()
}
