// ABOUTME: Expansion of a template week plus a sparse progression matrix into a full program
// ABOUTME: Applies per-week field overrides, deload volume reduction, and mesocycle grouping

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Progression Expander
//!
//! Turns one template [`Microcycle`] (week 1) and a sparse progression
//! matrix into the complete multi-week [`Macrocycle`]. Each week starts as a
//! clone of the template; the matrix entry for that week overwrites only the
//! fields it lists. Deload weeks additionally cut every exercise's sets by
//! 40% (floor, minimum 2) and back RIR effort off by 2, capped at 5.
//!
//! When the generator produced no usable matrix, a default undulating wave
//! is synthesized: `low -> medium -> high -> deload` repeating, with the
//! deload slot replaced by `medium` when deload weeks are disabled.

use serde::Deserialize;
use tracing::debug;

use crate::models::{
    EffortType, IntensityLevel, Macrocycle, Mesocycle, Microcycle, PrimaryGoal, TrainingDay,
    WorkoutRequest,
};

// ============================================================================
// Progression Matrix (wire format)
// ============================================================================

/// Sparse per-week override matrix, consumed once and discarded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressionMatrix {
    /// Per-week entries; weeks absent here fall back to template values
    #[serde(default)]
    pub progression: Vec<WeekEntry>,
    /// Week numbers that get the deload volume reduction
    #[serde(default)]
    pub deload_weeks: Vec<u32>,
}

/// Overrides for one week
#[derive(Debug, Clone, Deserialize)]
pub struct WeekEntry {
    /// 1-based week number across the whole program
    pub week: u32,
    /// Intensity tag for the week
    #[serde(default)]
    pub intensity: Option<IntensityLevel>,
    /// Field-level exercise overrides
    #[serde(default)]
    pub changes: Vec<ExerciseChange>,
}

/// Field overrides for one exercise within one day; absent fields keep the
/// template value
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseChange {
    /// `day` = day_number of the target day
    pub day: u32,
    /// `ex_idx` = order index of the target exercise within the day
    #[serde(default)]
    pub ex_idx: u32,
    /// `s` = sets
    #[serde(rename = "s", default)]
    pub sets: Option<u32>,
    /// `ev` = effort_value
    #[serde(rename = "ev", default)]
    pub effort_value: Option<u8>,
    /// `rm` = reps_min
    #[serde(rename = "rm", default)]
    pub reps_min: Option<u32>,
    /// `rx` = reps_max
    #[serde(rename = "rx", default)]
    pub reps_max: Option<u32>,
    /// `rs` = rest_seconds
    #[serde(rename = "rs", default)]
    pub rest_seconds: Option<u32>,
}

impl ProgressionMatrix {
    /// Synthesize the default undulating wave for weeks 2..=total
    #[must_use]
    pub fn default_wave(total_weeks: u32, include_deload: bool) -> Self {
        let mut progression = Vec::new();
        let mut deload_weeks = Vec::new();

        for week in 2..=total_weeks {
            let intensity = match (week - 1) % 4 {
                0 => IntensityLevel::Low,
                1 => IntensityLevel::Medium,
                2 => IntensityLevel::High,
                _ => {
                    if include_deload {
                        deload_weeks.push(week);
                        IntensityLevel::Deload
                    } else {
                        IntensityLevel::Medium
                    }
                }
            };
            progression.push(WeekEntry {
                week,
                intensity: Some(intensity),
                changes: Vec::new(),
            });
        }

        Self {
            progression,
            deload_weeks,
        }
    }

    fn week_entry(&self, week: u32) -> Option<&WeekEntry> {
        self.progression.iter().find(|entry| entry.week == week)
    }
}

// ============================================================================
// Expansion
// ============================================================================

/// Human-readable goal label for the program title
fn goal_label(goal: PrimaryGoal) -> &'static str {
    match goal {
        PrimaryGoal::Hypertrophy => "Hypertrophy",
        PrimaryGoal::Strength => "Strength",
        PrimaryGoal::Power => "Power",
        PrimaryGoal::Endurance => "Endurance",
        PrimaryGoal::FatLoss => "Fat Loss",
        PrimaryGoal::GeneralFitness => "General Fitness",
    }
}

/// Mesocycle focus labels for a goal, cycled by block number
fn meso_focus(block_number: u32, goal: PrimaryGoal) -> &'static str {
    let focuses: [&str; 4] = match goal {
        PrimaryGoal::Hypertrophy => [
            "Accumulation",
            "Intensification",
            "Realization",
            "Deload/Transition",
        ],
        PrimaryGoal::Strength => ["Strength Base", "Development", "Peak", "Recovery"],
        PrimaryGoal::FatLoss => [
            "Metabolic Adaptation",
            "Progressive Deficit",
            "Maintenance",
            "Reload",
        ],
        _ => ["Phase 1", "Phase 2", "Phase 3", "Phase 4"],
    };
    focuses[((block_number - 1) % 4) as usize]
}

/// Template-plus-matrix program expander
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressionExpander;

impl ProgressionExpander {
    /// Expand the template week into the full program.
    ///
    /// Mesocycle count is `ceil(total_weeks / mesocycle_weeks)`; each week
    /// clones the template's training days and applies the matrix entry for
    /// that week. Week 1 always runs at `low` intensity.
    #[must_use]
    pub fn expand(
        template: &Microcycle,
        matrix: &ProgressionMatrix,
        request: &WorkoutRequest,
    ) -> Macrocycle {
        let total_weeks = request.program_duration.total_weeks.max(1);
        let mesocycle_weeks = request.program_duration.mesocycle_weeks.max(1);
        let goal = request.goals.primary_goal;
        let num_mesocycles = total_weeks.div_ceil(mesocycle_weeks);

        debug!(
            total_weeks,
            mesocycle_weeks, num_mesocycles, "expanding template week"
        );

        let mut mesocycles = Vec::with_capacity(num_mesocycles as usize);
        let mut week = 1_u32;

        for block_number in 1..=num_mesocycles {
            let weeks_in_block = mesocycle_weeks.min(total_weeks - week + 1);
            let mut microcycles = Vec::with_capacity(weeks_in_block as usize);

            for week_in_block in 1..=weeks_in_block {
                microcycles.push(Self::build_week(template, matrix, week, week_in_block));
                week += 1;
            }

            mesocycles.push(Mesocycle {
                block_number,
                name: format!("Block {block_number}"),
                focus: meso_focus(block_number, goal).to_owned(),
                description: String::new(),
                start_date: None,
                end_date: None,
                microcycles,
            });
        }

        Macrocycle {
            name: format!("{} Program - {total_weeks} Weeks", goal_label(goal)),
            description: String::new(),
            objective: goal,
            start_date: None,
            end_date: None,
            mesocycles,
        }
    }

    fn build_week(
        template: &Microcycle,
        matrix: &ProgressionMatrix,
        week: u32,
        week_in_block: u32,
    ) -> Microcycle {
        let entry = matrix.week_entry(week);
        let matrix_intensity = entry.and_then(|e| e.intensity);

        let intensity = if matrix.deload_weeks.contains(&week) {
            IntensityLevel::Deload
        } else if week == 1 {
            // The opening week is always an adaptation week, even when the
            // matrix tags it otherwise
            IntensityLevel::Low
        } else {
            matrix_intensity.unwrap_or(IntensityLevel::Medium)
        };

        let mut training_days: Vec<TrainingDay> = template.training_days.clone();

        if let Some(entry) = entry {
            for change in &entry.changes {
                Self::apply_change(&mut training_days, change);
            }
        }

        if intensity == IntensityLevel::Deload {
            for day in &mut training_days {
                Self::apply_deload(day);
            }
        }

        let name = if intensity == IntensityLevel::Deload {
            format!("Week {week} - Deload")
        } else {
            format!("Week {week}")
        };

        Microcycle {
            week_number: week_in_block,
            name,
            intensity_level: intensity,
            start_date: None,
            end_date: None,
            training_days,
        }
    }

    /// Overwrite only the fields the change lists; targets are located by
    /// day_number and exercise order_index
    fn apply_change(training_days: &mut [TrainingDay], change: &ExerciseChange) {
        let Some(day) = training_days
            .iter_mut()
            .find(|day| day.day_number == change.day)
        else {
            return;
        };
        let Some(exercise) = day
            .exercises
            .iter_mut()
            .find(|exercise| exercise.order_index == change.ex_idx)
        else {
            return;
        };

        if let Some(sets) = change.sets {
            exercise.sets = sets;
        }
        if let Some(effort_value) = change.effort_value {
            exercise.effort.effort_value = effort_value;
        }
        if let Some(reps_min) = change.reps_min {
            exercise.reps_min = Some(reps_min);
        }
        if let Some(reps_max) = change.reps_max {
            exercise.reps_max = Some(reps_max);
        }
        if let Some(rest_seconds) = change.rest_seconds {
            exercise.rest_seconds = rest_seconds;
        }
    }

    /// Deload reduction: sets to 60% (floor, minimum 2); RIR effort backed
    /// off by 2, capped at 5
    fn apply_deload(day: &mut TrainingDay) {
        for exercise in &mut day.exercises {
            let reduced = u64::from(exercise.sets) * 6 / 10;
            exercise.sets = 2.max(reduced as u32);
            if exercise.effort.effort_type == EffortType::Rir {
                exercise.effort.effort_value =
                    exercise.effort.effort_value.saturating_add(2).min(5);
            }
        }
    }
}
