// ABOUTME: Bidirectional mapping between the compact wire schema and the canonical model
// ABOUTME: Mirror structs with serde renames keep both directions on one key table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Schema Expander
//!
//! Translates between the compact wire schema the generator emits
//! (single-letter keys to save output tokens) and the canonical program
//! model. Both directions share one mapping table: the `#[serde(rename)]`
//! attributes on the mirror structs below.
//!
//! Expansion is idempotent. A payload that already carries the canonical
//! top-level `macrocycle` key is deserialized directly; only payloads with
//! the compact `m` key go through the mirror structs. Fields absent from a
//! compact payload take their documented defaults (`ec` -> `strength`,
//! `ph` -> `main`, `s` -> 3, `rs` -> 90, `et`/`ev` -> RIR 2) or stay unset.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::{
    CardioSubclass, DayExercise, Effort, EffortType, ExerciseClass, ExercisePhase, IntensityLevel,
    Macrocycle, Mesocycle, Microcycle, PrimaryGoal, ProgramExplanation, TrainingDay,
};

/// Fully expanded generator payload
#[derive(Debug, Clone)]
pub struct CanonicalPayload {
    /// The program hierarchy
    pub macrocycle: Macrocycle,
    /// Narrative explanation, when the generator provided one
    pub explanation: Option<ProgramExplanation>,
}

// ============================================================================
// Compact Wire Schema (mirror structs)
// ============================================================================

/// Top-level compact payload: `m` = macrocycle, `e` = explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactPayload {
    /// Macrocycle
    #[serde(rename = "m")]
    pub macrocycle: CompactMacrocycle,
    /// Explanation
    #[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<CompactExplanation>,
}

/// Compact macrocycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactMacrocycle {
    /// `n` = name
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `d` = description
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `o` = objective
    #[serde(rename = "o", default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<PrimaryGoal>,
    /// `ms` = mesocycles
    #[serde(rename = "ms", default, skip_serializing_if = "Vec::is_empty")]
    pub mesocycles: Vec<CompactMesocycle>,
    /// `mc` = microcycles attached directly to the macrocycle; some base-week
    /// responses skip the mesocycle level entirely
    #[serde(rename = "mc", default, skip_serializing_if = "Vec::is_empty")]
    pub microcycles: Vec<CompactMicrocycle>,
}

/// Compact mesocycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactMesocycle {
    /// `b` = block_number
    #[serde(rename = "b", default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u32>,
    /// `n` = name
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `f` = focus
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// `d` = description
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `mc` = microcycles
    #[serde(rename = "mc", default, skip_serializing_if = "Vec::is_empty")]
    pub microcycles: Vec<CompactMicrocycle>,
}

/// Compact microcycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactMicrocycle {
    /// `w` = week_number
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u32>,
    /// `n` = name
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `i` = intensity_level
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub intensity_level: Option<IntensityLevel>,
    /// `td` = training_days
    #[serde(rename = "td", default, skip_serializing_if = "Vec::is_empty")]
    pub training_days: Vec<CompactTrainingDay>,
}

/// Compact training day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactTrainingDay {
    /// `d` = day_number
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub day_number: Option<u32>,
    /// `n` = name
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `f` = focus
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// `r` = rest_day
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub rest_day: Option<bool>,
    /// `ex` = exercises
    #[serde(rename = "ex", default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<CompactExercise>,
}

/// Compact exercise prescription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactExercise {
    /// `id` = exercise_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `n` = exercise_name
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `o` = order_index
    #[serde(rename = "o", default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    /// `ph` = phase
    #[serde(rename = "ph", default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<ExercisePhase>,
    /// `ec` = exercise_class
    #[serde(rename = "ec", default, skip_serializing_if = "Option::is_none")]
    pub exercise_class: Option<ExerciseClass>,
    /// `cs` = cardio_subclass
    #[serde(rename = "cs", default, skip_serializing_if = "Option::is_none")]
    pub cardio_subclass: Option<CardioSubclass>,
    /// `iz` = intensity_zone
    #[serde(rename = "iz", default, skip_serializing_if = "Option::is_none")]
    pub intensity_zone: Option<u8>,
    /// `s` = sets
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// `rm` = reps_min
    #[serde(rename = "rm", default, skip_serializing_if = "Option::is_none")]
    pub reps_min: Option<u32>,
    /// `rx` = reps_max
    #[serde(rename = "rx", default, skip_serializing_if = "Option::is_none")]
    pub reps_max: Option<u32>,
    /// `ds` = duration_seconds
    #[serde(rename = "ds", default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// `rs` = rest_seconds
    #[serde(rename = "rs", default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    /// `et` = effort_type
    #[serde(rename = "et", default, skip_serializing_if = "Option::is_none")]
    pub effort_type: Option<EffortType>,
    /// `ev` = effort_value
    #[serde(rename = "ev", default, skip_serializing_if = "Option::is_none")]
    pub effort_value: Option<u8>,
    /// `t` = tempo
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
    /// `nt` = notes
    #[serde(rename = "nt", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Compact explanation block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompactExplanation {
    /// `r` = rationale
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// `p` = progression_strategy
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub progression_strategy: Option<String>,
    /// `ds` = deload_strategy
    #[serde(rename = "ds", default, skip_serializing_if = "Option::is_none")]
    pub deload_strategy: Option<String>,
    /// `v` = volume_distribution
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub volume_distribution: Option<String>,
    /// `t` = tips
    #[serde(rename = "t", default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

// ============================================================================
// Expansion
// ============================================================================

/// Expand a decoded payload into the canonical model.
///
/// Idempotent: canonical payloads pass through a direct deserialization,
/// detected by probing for the `macrocycle` top-level key.
///
/// # Errors
///
/// Returns `MissingRequiredField` when the payload has neither a canonical
/// nor a compact macrocycle, and `SerializationError` when the shape does
/// not deserialize.
pub fn expand(value: &Value) -> AppResult<CanonicalPayload> {
    if value.get("macrocycle").is_some() {
        let macrocycle: Macrocycle = serde_json::from_value(value["macrocycle"].clone())?;
        let explanation = match value.get("explanation") {
            Some(raw) => Some(serde_json::from_value(raw.clone())?),
            None => None,
        };
        return Ok(CanonicalPayload {
            macrocycle,
            explanation,
        });
    }

    if value.get("m").is_some() {
        let compact: CompactPayload = serde_json::from_value(value.clone())?;
        return Ok(expand_compact(compact));
    }

    Err(AppError::new(
        crate::errors::ErrorCode::MissingRequiredField,
        "payload has neither 'macrocycle' nor 'm' at the top level",
    ))
}

/// Expand a compact payload, applying the documented defaults
#[must_use]
pub fn expand_compact(compact: CompactPayload) -> CanonicalPayload {
    let m = compact.macrocycle;

    // Some base-week responses attach microcycles directly to the
    // macrocycle; wrap them in a synthetic first block
    let mesocycles = if m.mesocycles.is_empty() && !m.microcycles.is_empty() {
        vec![CompactMesocycle {
            block_number: Some(1),
            microcycles: m.microcycles,
            ..CompactMesocycle::default()
        }]
    } else {
        m.mesocycles
    };

    let macrocycle = Macrocycle {
        name: m.name.unwrap_or_else(|| "Training Program".to_owned()),
        description: m.description.unwrap_or_default(),
        objective: m.objective.unwrap_or(PrimaryGoal::GeneralFitness),
        start_date: None,
        end_date: None,
        mesocycles: mesocycles.into_iter().map(expand_mesocycle).collect(),
    };

    let explanation = compact.explanation.map(|e| ProgramExplanation {
        rationale: e.rationale.unwrap_or_default(),
        progression_strategy: e.progression_strategy.unwrap_or_default(),
        deload_strategy: e.deload_strategy,
        volume_distribution: e.volume_distribution,
        tips: e.tips,
    });

    CanonicalPayload {
        macrocycle,
        explanation,
    }
}

fn expand_mesocycle(compact: CompactMesocycle) -> Mesocycle {
    let block_number = compact.block_number.unwrap_or(1);
    Mesocycle {
        block_number,
        name: compact
            .name
            .unwrap_or_else(|| format!("Block {block_number}")),
        focus: compact.focus.unwrap_or_default(),
        description: compact.description.unwrap_or_default(),
        start_date: None,
        end_date: None,
        microcycles: compact
            .microcycles
            .into_iter()
            .map(expand_microcycle)
            .collect(),
    }
}

fn expand_microcycle(compact: CompactMicrocycle) -> Microcycle {
    let week_number = compact.week_number.unwrap_or(1);
    Microcycle {
        week_number,
        name: compact
            .name
            .unwrap_or_else(|| format!("Week {week_number}")),
        intensity_level: compact.intensity_level.unwrap_or(IntensityLevel::Medium),
        start_date: None,
        end_date: None,
        training_days: compact
            .training_days
            .into_iter()
            .map(expand_training_day)
            .collect(),
    }
}

fn expand_training_day(compact: CompactTrainingDay) -> TrainingDay {
    let day_number = compact.day_number.unwrap_or(1);
    TrainingDay {
        day_number,
        name: compact.name.unwrap_or_else(|| format!("Day {day_number}")),
        focus: compact.focus.unwrap_or_default(),
        rest_day: compact.rest_day.unwrap_or(false),
        date: None,
        exercises: compact
            .exercises
            .into_iter()
            .enumerate()
            .map(|(idx, exercise)| expand_exercise(exercise, idx as u32))
            .collect(),
    }
}

fn expand_exercise(compact: CompactExercise, position: u32) -> DayExercise {
    DayExercise {
        exercise_id: compact.id.unwrap_or_default(),
        exercise_name: compact.name.unwrap_or_default(),
        order_index: compact.order_index.unwrap_or(position),
        phase: compact.phase.unwrap_or(ExercisePhase::Main),
        exercise_class: compact.exercise_class.unwrap_or(ExerciseClass::Strength),
        cardio_subclass: compact.cardio_subclass,
        intensity_zone: compact.intensity_zone,
        sets: compact.sets.unwrap_or(3),
        reps_min: compact.reps_min,
        reps_max: compact.reps_max,
        duration_seconds: compact.duration_seconds,
        rest_seconds: compact.rest_seconds.unwrap_or(90),
        effort: Effort {
            effort_type: compact.effort_type.unwrap_or(EffortType::Rir),
            effort_value: compact.effort_value.unwrap_or(2),
        },
        tempo: compact.tempo,
        notes: compact.notes,
    }
}

// ============================================================================
// Compression
// ============================================================================

/// Re-compress a canonical payload into the compact wire schema.
///
/// Inverse of [`expand`] modulo applied defaults: every populated canonical
/// field maps back through the same rename table.
#[must_use]
pub fn compress(payload: &CanonicalPayload) -> CompactPayload {
    CompactPayload {
        macrocycle: CompactMacrocycle {
            name: Some(payload.macrocycle.name.clone()),
            description: Some(payload.macrocycle.description.clone()),
            objective: Some(payload.macrocycle.objective),
            mesocycles: payload
                .macrocycle
                .mesocycles
                .iter()
                .map(compress_mesocycle)
                .collect(),
            microcycles: Vec::new(),
        },
        explanation: payload.explanation.as_ref().map(|e| CompactExplanation {
            rationale: Some(e.rationale.clone()),
            progression_strategy: Some(e.progression_strategy.clone()),
            deload_strategy: e.deload_strategy.clone(),
            volume_distribution: e.volume_distribution.clone(),
            tips: e.tips.clone(),
        }),
    }
}

fn compress_mesocycle(meso: &Mesocycle) -> CompactMesocycle {
    CompactMesocycle {
        block_number: Some(meso.block_number),
        name: Some(meso.name.clone()),
        focus: Some(meso.focus.clone()),
        description: Some(meso.description.clone()),
        microcycles: meso.microcycles.iter().map(compress_microcycle).collect(),
    }
}

fn compress_microcycle(micro: &Microcycle) -> CompactMicrocycle {
    CompactMicrocycle {
        week_number: Some(micro.week_number),
        name: Some(micro.name.clone()),
        intensity_level: Some(micro.intensity_level),
        training_days: micro
            .training_days
            .iter()
            .map(compress_training_day)
            .collect(),
    }
}

fn compress_training_day(day: &TrainingDay) -> CompactTrainingDay {
    CompactTrainingDay {
        day_number: Some(day.day_number),
        name: Some(day.name.clone()),
        focus: Some(day.focus.clone()),
        rest_day: Some(day.rest_day),
        exercises: day.exercises.iter().map(compress_exercise).collect(),
    }
}

fn compress_exercise(exercise: &DayExercise) -> CompactExercise {
    CompactExercise {
        id: Some(exercise.exercise_id.clone()),
        name: Some(exercise.exercise_name.clone()),
        order_index: Some(exercise.order_index),
        phase: Some(exercise.phase),
        exercise_class: Some(exercise.exercise_class),
        cardio_subclass: exercise.cardio_subclass,
        intensity_zone: exercise.intensity_zone,
        sets: Some(exercise.sets),
        reps_min: exercise.reps_min,
        reps_max: exercise.reps_max,
        duration_seconds: exercise.duration_seconds,
        rest_seconds: Some(exercise.rest_seconds),
        effort_type: Some(exercise.effort.effort_type),
        effort_value: Some(exercise.effort.effort_value),
        tempo: exercise.tempo.clone(),
        notes: exercise.notes.clone(),
    }
}

/// Pull the template microcycle (week 1) out of a base-week payload.
///
/// # Errors
///
/// Returns an error when the payload expands to a program without any
/// microcycle.
pub fn extract_template_week(value: &Value) -> AppResult<Microcycle> {
    let payload = expand(value)?;
    payload
        .macrocycle
        .mesocycles
        .into_iter()
        .flat_map(|meso| meso.microcycles)
        .next()
        .ok_or_else(|| {
            AppError::constraint_violation("base-week payload contains no microcycle")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compact_value() -> Value {
        json!({
            "m": {
                "n": "Hypertrophy Block",
                "d": "Upper/lower split",
                "o": "hypertrophy",
                "ms": [{
                    "b": 1,
                    "n": "Phase 1",
                    "f": "Accumulation",
                    "mc": [{
                        "w": 1,
                        "i": "medium",
                        "td": [{
                            "d": 1,
                            "n": "Push",
                            "f": "Chest/Shoulders/Triceps",
                            "r": false,
                            "ex": [
                                {"id": "ex-1", "n": "Bench Press", "s": 3, "rm": 8, "rx": 12,
                                 "rs": 90, "et": "RIR", "ev": 2},
                                {"id": "ex-2", "n": "Bike", "ds": 600, "ec": "cardio",
                                 "cs": "liss", "iz": 2}
                            ]
                        }]
                    }]
                }]
            },
            "e": {"r": "Balanced start", "p": "Weekly volume ramps", "t": ["Track your loads"]}
        })
    }

    #[test]
    fn test_expand_compact_applies_defaults() {
        let payload = expand(&compact_value()).unwrap();
        let day = &payload.macrocycle.mesocycles[0].microcycles[0].training_days[0];
        let bench = &day.exercises[0];
        let bike = &day.exercises[1];

        // Absent `ph` and `ec` take the documented defaults
        assert_eq!(bench.phase, ExercisePhase::Main);
        assert_eq!(bench.exercise_class, ExerciseClass::Strength);
        // Absent `o` falls back to enumeration position
        assert_eq!(bike.order_index, 1);
        // Cardio entry keeps its duration, no invented reps
        assert_eq!(bike.duration_seconds, Some(600));
        assert!(bike.reps_min.is_none());
        // Absent `s`/`rs`/`et`/`ev` take defaults
        assert_eq!(bike.sets, 3);
        assert_eq!(bike.rest_seconds, 90);

        let explanation = payload.explanation.unwrap();
        assert_eq!(explanation.rationale, "Balanced start");
        assert_eq!(explanation.tips.len(), 1);
    }

    #[test]
    fn test_expand_is_idempotent_on_canonical_payloads() {
        let expanded = expand(&compact_value()).unwrap();
        let canonical = json!({
            "macrocycle": serde_json::to_value(&expanded.macrocycle).unwrap(),
            "explanation": serde_json::to_value(&expanded.explanation).unwrap(),
        });

        let reexpanded = expand(&canonical).unwrap();
        assert_eq!(
            serde_json::to_value(&reexpanded.macrocycle).unwrap(),
            serde_json::to_value(&expanded.macrocycle).unwrap()
        );
    }

    #[test]
    fn test_round_trip_modulo_defaults() {
        let expanded = expand(&compact_value()).unwrap();
        let compact = compress(&expanded);
        let rewired = serde_json::to_value(&compact).unwrap();
        let reexpanded = expand(&rewired).unwrap();

        assert_eq!(
            serde_json::to_value(&reexpanded.macrocycle).unwrap(),
            serde_json::to_value(&expanded.macrocycle).unwrap()
        );
    }

    #[test]
    fn test_microcycles_directly_under_macrocycle() {
        let value = json!({
            "m": {
                "n": "Base Week",
                "mc": [{"w": 1, "td": [{"d": 1, "ex": [{"id": "ex-1", "rm": 5, "rx": 8}]}]}]
            }
        });
        let template = extract_template_week(&value).unwrap();
        assert_eq!(template.week_number, 1);
        assert_eq!(template.training_days.len(), 1);
    }

    #[test]
    fn test_unrecognized_top_level_is_an_error() {
        let err = expand(&json!({"plan": {}})).unwrap_err();
        assert_eq!(
            err.code,
            crate::errors::ErrorCode::MissingRequiredField
        );
    }
}
