// ABOUTME: Catalog-closure and session-limit validation plus fuzzy exercise repair
// ABOUTME: Validation emits warnings without aborting; the mapper rewrites invalid ids in place

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Validator and Exercise Mapper
//!
//! The validator walks every exercise in an expanded program and reports
//! catalog misses and sessions over the per-level exercise ceiling as
//! human-readable warnings. Validation never fails a generation.
//!
//! The mapper then repairs invalid references: an exact case-insensitive
//! name match wins outright; otherwise catalog entries are scored by shared
//! name tokens with a +2 bonus when the training day's focus text names one
//! of the entry's primary muscles. Ties keep catalog order.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::models::{CatalogExercise, ExerciseCatalog, FitnessLevel, Macrocycle};

/// Muscle-group hints recognized in a day's focus text
const FOCUS_MUSCLE_HINTS: [&str; 6] = ["chest", "back", "shoulders", "arms", "legs", "core"];

// ============================================================================
// Validator
// ============================================================================

/// Warning-only structural validator
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Validate catalog closure and per-session exercise limits.
    ///
    /// Returns human-readable warnings; an empty list means a clean program.
    #[must_use]
    pub fn validate(
        program: &Macrocycle,
        catalog: &ExerciseCatalog,
        fitness_level: FitnessLevel,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        let mut invalid: Vec<String> = Vec::new();
        for exercise in program.exercises() {
            if !exercise.exercise_id.is_empty() && !catalog.contains_id(&exercise.exercise_id) {
                let display = if exercise.exercise_name.is_empty() {
                    exercise.exercise_id.clone()
                } else {
                    exercise.exercise_name.clone()
                };
                if seen.insert(display.clone()) {
                    invalid.push(display);
                }
            }
        }
        if !invalid.is_empty() {
            warnings.push(format!(
                "The following exercises are not in the catalog and need review: {}{}",
                invalid[..invalid.len().min(5)].join(", "),
                overflow_suffix(invalid.len(), 5)
            ));
        }

        let limit = fitness_level.session_exercise_limit();
        let exceeding: Vec<String> = program
            .days()
            .filter(|day| !day.rest_day && day.exercises.len() > limit)
            .map(|day| format!("{} ({} exercises)", day.name, day.exercises.len()))
            .collect();
        if !exceeding.is_empty() {
            warnings.push(format!(
                "The following sessions exceed the recommended limit of {limit} exercises for {fitness_level} level: {}{}",
                exceeding[..exceeding.len().min(3)].join(", "),
                overflow_suffix(exceeding.len(), 3)
            ));
        }

        warnings
    }
}

fn overflow_suffix(total: usize, shown: usize) -> String {
    if total > shown {
        format!(" and {} more", total - shown)
    } else {
        String::new()
    }
}

// ============================================================================
// Exercise Mapper
// ============================================================================

/// Repairs invalid exercise references against the catalog snapshot
#[derive(Debug)]
pub struct ExerciseMapper<'a> {
    catalog: &'a ExerciseCatalog,
    repaired: usize,
    unmapped: Vec<String>,
}

impl<'a> ExerciseMapper<'a> {
    /// Create a mapper over one catalog snapshot
    #[must_use]
    pub fn new(catalog: &'a ExerciseCatalog) -> Self {
        Self {
            catalog,
            repaired: 0,
            unmapped: Vec::new(),
        }
    }

    /// Number of references rewritten by the last [`repair_program`] run
    ///
    /// [`repair_program`]: Self::repair_program
    #[must_use]
    pub const fn repaired_count(&self) -> usize {
        self.repaired
    }

    /// Names that could not be mapped to any catalog entry
    #[must_use]
    pub fn unmapped(&self) -> &[String] {
        &self.unmapped
    }

    /// Rewrite every invalid exercise id/name pair in place.
    ///
    /// Unrepairable names are collected for caller-visible warnings.
    pub fn repair_program(&mut self, program: &mut Macrocycle) {
        self.repaired = 0;
        self.unmapped.clear();

        for mesocycle in &mut program.mesocycles {
            for microcycle in &mut mesocycle.microcycles {
                for day in &mut microcycle.training_days {
                    let muscle_hint = focus_muscle_hint(&day.focus);
                    for exercise in &mut day.exercises {
                        if self.catalog.contains_id(&exercise.exercise_id) {
                            continue;
                        }
                        match self.find_best_match(&exercise.exercise_name, muscle_hint) {
                            Some(entry) => {
                                debug!(
                                    from = %exercise.exercise_name,
                                    to = %entry.name,
                                    id = %entry.id,
                                    "remapped exercise reference"
                                );
                                exercise.exercise_id = entry.id.clone();
                                exercise.exercise_name = entry.name.clone();
                                self.repaired += 1;
                            }
                            None => {
                                warn!(
                                    name = %exercise.exercise_name,
                                    id = %exercise.exercise_id,
                                    "no catalog match for exercise"
                                );
                                self.unmapped.push(exercise.exercise_name.clone());
                            }
                        }
                    }
                }
            }
        }

        if self.repaired > 0 {
            info!(repaired = self.repaired, "exercise references remapped");
        }
    }

    /// Best catalog entry for a denormalized name: exact lowercase match
    /// first, then token-overlap scoring with the muscle bonus. Ties keep
    /// catalog order.
    #[must_use]
    pub fn find_best_match(
        &self,
        exercise_name: &str,
        muscle_hint: Option<&str>,
    ) -> Option<&'a CatalogExercise> {
        let name_lower = exercise_name.to_lowercase();
        if let Some(entry) = self.catalog.by_name(&name_lower) {
            return Some(entry);
        }

        let tokens: HashSet<&str> = name_lower.split_whitespace().collect();
        let mut best: Option<(u32, &CatalogExercise)> = None;

        for entry in self.catalog.exercises() {
            let entry_name = entry.name.to_lowercase();
            let mut score = entry_name
                .split_whitespace()
                .filter(|token| tokens.contains(token))
                .count() as u32;
            if score == 0 {
                continue;
            }
            if let Some(muscle) = muscle_hint {
                if entry
                    .primary_muscles
                    .iter()
                    .any(|m| m.eq_ignore_ascii_case(muscle))
                {
                    score += 2;
                }
            }
            // Strictly-greater keeps the earliest catalog entry on ties
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, entry));
            }
        }

        best.map(|(_, entry)| entry)
    }
}

/// First recognized muscle-group hint in a day's focus text
fn focus_muscle_hint(focus: &str) -> Option<&'static str> {
    let focus_lower = focus.to_lowercase();
    FOCUS_MUSCLE_HINTS
        .into_iter()
        .find(|hint| focus_lower.contains(hint))
}
