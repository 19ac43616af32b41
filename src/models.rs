// ABOUTME: Core data models for training programs, the exercise catalog, and generation requests
// ABOUTME: Defines Macrocycle through DayExercise plus questionnaire and response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Data Models
//!
//! Core data structures used throughout the generation engine.
//!
//! ## Design Principles
//!
//! - **Strict containment**: each periodization level is owned exclusively by
//!   its parent and created only by the engine
//! - **Serializable**: all models support JSON serialization with canonical
//!   field names; the compact wire representation lives in `engine::schema`
//! - **Catalog as arena**: the exercise catalog snapshot is an immutable input
//!   passed explicitly into every component
//!
//! ## Core Models
//!
//! - [`Macrocycle`] / [`Mesocycle`] / [`Microcycle`] / [`TrainingDay`] /
//!   [`DayExercise`]: the periodized program hierarchy
//! - [`ExerciseCatalog`]: read-only catalog snapshot with id/name indexes
//! - [`WorkoutRequest`]: questionnaire input for one generation request
//! - [`WorkoutResponse`]: caller-facing result envelope

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

// ============================================================================
// Enumerations
// ============================================================================

/// User experience level, also bounds exercises per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    /// New to structured training
    Beginner,
    /// Consistent training history
    Intermediate,
    /// Several years of structured training
    Advanced,
}

impl FitnessLevel {
    /// Maximum recommended exercises per session for this level
    #[must_use]
    pub const fn session_exercise_limit(self) -> usize {
        match self {
            Self::Beginner => 4,
            Self::Intermediate => 6,
            Self::Advanced => 8,
        }
    }
}

impl Display for FitnessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

/// Primary training goal of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    /// Muscle growth
    Hypertrophy,
    /// Maximal strength
    Strength,
    /// Explosive power
    Power,
    /// Muscular endurance
    Endurance,
    /// Body fat reduction
    FatLoss,
    /// General health and fitness
    GeneralFitness,
}

impl Display for PrimaryGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Hypertrophy => "hypertrophy",
            Self::Strength => "strength",
            Self::Power => "power",
            Self::Endurance => "endurance",
            Self::FatLoss => "fat_loss",
            Self::GeneralFitness => "general_fitness",
        };
        write!(f, "{s}")
    }
}

/// Weekly intensity tag on a microcycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    /// Adaptation / introduction volume
    Low,
    /// Standard working volume
    Medium,
    /// Peak volume or intensity
    High,
    /// Deliberately reduced recovery week
    Deload,
}

/// Position of an exercise within a training day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExercisePhase {
    /// Session preparation
    Warmup,
    /// Main working block
    Main,
    /// Light finishing work
    Cooldown,
}

/// Parametrization class of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseClass {
    /// Rep-range based resistance work
    Strength,
    /// Duration-based cardiovascular work
    Cardio,
    /// Low-rep explosive work with long rests
    Plyometric,
    /// Duration-based stretching
    Flexibility,
    /// Range-of-motion work
    Mobility,
    /// Session preparation drills
    Warmup,
    /// Mixed strength/cardio conditioning
    Conditioning,
    /// Stability and balance work
    Balance,
}

/// Cardio sub-class determining duration and heart-rate zone ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardioSubclass {
    /// Low intensity steady state
    Liss,
    /// High intensity interval training
    Hiit,
    /// Moderate intensity steady state
    Miss,
}

/// Subjective or percentage-based effort scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortType {
    /// Reps in reserve (0-10)
    #[serde(rename = "RIR")]
    Rir,
    /// Rate of perceived exertion (0-10)
    #[serde(rename = "RPE")]
    Rpe,
    /// Percentage of one-rep max (0-100)
    #[serde(rename = "percentage")]
    Percentage,
}

/// Muscle groups a user can ask the program to emphasize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
}

impl MuscleGroup {
    /// Lowercase name used for catalog matching and focus-text hints
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Core => "core",
        }
    }

    /// All muscle groups, in the order used for focus-text scanning
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Chest,
            Self::Back,
            Self::Shoulders,
            Self::Arms,
            Self::Legs,
            Self::Core,
        ]
    }
}

/// Equipment the user has access to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EquipmentType {
    Barbell,
    Dumbbells,
    Cables,
    Machines,
    Kettlebells,
    ResistanceBands,
    PullUpBar,
    Bench,
    SquatRack,
    Bodyweight,
}

impl EquipmentType {
    /// Lowercase identifier matching the catalog's equipment column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Barbell => "barbell",
            Self::Dumbbells => "dumbbells",
            Self::Cables => "cables",
            Self::Machines => "machines",
            Self::Kettlebells => "kettlebells",
            Self::ResistanceBands => "resistance_bands",
            Self::PullUpBar => "pull_up_bar",
            Self::Bench => "bench",
            Self::SquatRack => "squat_rack",
            Self::Bodyweight => "bodyweight",
        }
    }

    /// Equipment implied by full gym access
    #[must_use]
    pub const fn gym_equipment() -> [Self; 6] {
        [
            Self::Barbell,
            Self::Dumbbells,
            Self::Cables,
            Self::Machines,
            Self::Bench,
            Self::SquatRack,
        ]
    }
}

/// Catalog difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

// ============================================================================
// Exercise Catalog Snapshot
// ============================================================================

/// One exercise record from the authoritative catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogExercise {
    /// Catalog id (UUID string in production data)
    pub id: String,
    /// Localized display name
    pub name: String,
    /// Movement class: `multiarticular`, `monoarticular`, or `cardio`
    pub movement_class: String,
    /// Primary muscles worked (lowercase)
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    /// Secondary / synergist muscles (lowercase)
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    /// Required equipment identifier, `bodyweight` or `none` when unneeded
    pub equipment: String,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Cardio sub-class, only populated for cardio entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio_subclass: Option<CardioSubclass>,
}

/// Immutable catalog snapshot supplied once per generation request.
///
/// Owns the records plus id and lowercase-name indexes so validation and
/// repair do not rescan the full list. The engine never mutates it.
#[derive(Debug)]
pub struct ExerciseCatalog {
    exercises: Vec<CatalogExercise>,
    index_by_id: HashMap<String, usize>,
    index_by_name: HashMap<String, usize>,
}

impl ExerciseCatalog {
    /// Build a snapshot from catalog records.
    ///
    /// Later duplicates of an id or name shadow earlier ones in the indexes;
    /// iteration order stays the supplied order.
    #[must_use]
    pub fn new(exercises: Vec<CatalogExercise>) -> Self {
        let mut index_by_id = HashMap::with_capacity(exercises.len());
        let mut index_by_name = HashMap::with_capacity(exercises.len());
        for (idx, exercise) in exercises.iter().enumerate() {
            index_by_id.insert(exercise.id.clone(), idx);
            index_by_name.insert(exercise.name.to_lowercase(), idx);
        }
        Self {
            exercises,
            index_by_id,
            index_by_name,
        }
    }

    /// All records in catalog order
    #[must_use]
    pub fn exercises(&self) -> &[CatalogExercise] {
        &self.exercises
    }

    /// Number of records in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Look up a record by exact id
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&CatalogExercise> {
        self.index_by_id.get(id).map(|&idx| &self.exercises[idx])
    }

    /// Look up a record by case-insensitive exact name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CatalogExercise> {
        self.index_by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.exercises[idx])
    }

    /// Whether the given id exists in the snapshot
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }
}

// ============================================================================
// Program Hierarchy
// ============================================================================

/// Effort descriptor for one exercise prescription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effort {
    /// Scale used for the value
    pub effort_type: EffortType,
    /// 0-10 for RIR/RPE, 0-100 for percentage
    pub effort_value: u8,
}

impl Default for Effort {
    fn default() -> Self {
        Self {
            effort_type: EffortType::Rir,
            effort_value: 2,
        }
    }
}

/// One prescribed exercise within a training day.
///
/// Exactly one of (`reps_min`/`reps_max`) or `duration_seconds` must be
/// populated; [`DayExercise::validate`] enforces this after schema expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayExercise {
    /// Catalog id of the exercise
    pub exercise_id: String,
    /// Denormalized exercise name for display and repair matching
    pub exercise_name: String,
    /// 0-based position within the day
    pub order_index: u32,
    /// Warmup / main / cooldown placement
    #[serde(default = "default_phase")]
    pub phase: ExercisePhase,
    /// Parametrization class
    #[serde(default = "default_exercise_class")]
    pub exercise_class: ExerciseClass,
    /// Cardio sub-class, only for cardio work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio_subclass: Option<CardioSubclass>,
    /// Heart-rate zone 1-5, only for cardio work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_zone: Option<u8>,
    /// Number of sets
    #[serde(default = "default_sets")]
    pub sets: u32,
    /// Lower bound of the rep range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_min: Option<u32>,
    /// Upper bound of the rep range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_max: Option<u32>,
    /// Duration for time-based work, mutually exclusive with the rep range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Rest between sets
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    /// Effort prescription
    #[serde(flatten)]
    pub effort: Effort,
    /// Optional tempo string, e.g. `2-0-2-0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for DayExercise {
    fn default() -> Self {
        Self {
            exercise_id: String::new(),
            exercise_name: String::new(),
            order_index: 0,
            phase: default_phase(),
            exercise_class: default_exercise_class(),
            cardio_subclass: None,
            intensity_zone: None,
            sets: default_sets(),
            reps_min: None,
            reps_max: None,
            duration_seconds: None,
            rest_seconds: default_rest_seconds(),
            effort: Effort::default(),
            tempo: None,
            notes: None,
        }
    }
}

impl DayExercise {
    /// Whether the rep range is populated (both bounds)
    #[must_use]
    pub const fn has_rep_range(&self) -> bool {
        self.reps_min.is_some() && self.reps_max.is_some()
    }

    /// Check the rep-range / duration exclusivity constraint
    pub fn validate(&self) -> AppResult<()> {
        match (self.has_rep_range(), self.duration_seconds.is_some()) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => Err(AppError::constraint_violation(format!(
                "exercise '{}' has both a rep range and a duration",
                self.exercise_name
            ))),
            (false, false) => Err(AppError::constraint_violation(format!(
                "exercise '{}' has neither a rep range nor a duration",
                self.exercise_name
            ))),
        }
    }
}

/// One calendar day inside a microcycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDay {
    /// 1-based day number, 1-14 to support extended recovery cycles
    pub day_number: u32,
    /// Display name, e.g. "Day 1 - Push"
    pub name: String,
    /// Focus text, e.g. "Chest, Shoulders, Triceps"
    #[serde(default)]
    pub focus: String,
    /// Whether this is a rest day
    #[serde(default)]
    pub rest_day: bool,
    /// Concrete date, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Ordered exercise prescriptions
    #[serde(default)]
    pub exercises: Vec<DayExercise>,
}

/// One training week inside a mesocycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Microcycle {
    /// 1-based week number within the mesocycle
    pub week_number: u32,
    /// Display name, e.g. "Week 3 - Deload"
    pub name: String,
    /// Intensity tag for the week
    pub intensity_level: IntensityLevel,
    /// First calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Ordered training days
    #[serde(default)]
    pub training_days: Vec<TrainingDay>,
}

impl Microcycle {
    /// Length of the microcycle in days: the maximum `day_number` observed,
    /// which supports non-7-day extended microcycles (scenario: days
    /// `{1,2,4,5}` give a 5-day week, not 7)
    #[must_use]
    pub fn length_in_days(&self) -> u32 {
        self.training_days
            .iter()
            .map(|day| day.day_number)
            .max()
            .unwrap_or(1)
    }
}

/// One training block inside a macrocycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesocycle {
    /// 1-based block number
    pub block_number: u32,
    /// Display name, e.g. "Block 2"
    pub name: String,
    /// Focus tag, e.g. "Intensification"
    #[serde(default)]
    pub focus: String,
    /// Optional longer description
    #[serde(default)]
    pub description: String,
    /// First calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Ordered training weeks
    #[serde(default)]
    pub microcycles: Vec<Microcycle>,
}

/// Top level of the periodized program hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macrocycle {
    /// Program name
    pub name: String,
    /// Program description
    #[serde(default)]
    pub description: String,
    /// Objective tag
    pub objective: PrimaryGoal,
    /// First calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last calendar day, assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Ordered training blocks
    #[serde(default)]
    pub mesocycles: Vec<Mesocycle>,
}

impl Macrocycle {
    /// Iterate all training days in program order
    pub fn days(&self) -> impl Iterator<Item = &TrainingDay> {
        self.mesocycles
            .iter()
            .flat_map(|meso| meso.microcycles.iter())
            .flat_map(|micro| micro.training_days.iter())
    }

    /// Iterate all prescribed exercises in program order
    pub fn exercises(&self) -> impl Iterator<Item = &DayExercise> {
        self.days().flat_map(|day| day.exercises.iter())
    }

    /// Check structural constraints on every training day: exclusivity of
    /// rep range vs duration, day-number range and uniqueness, order-index
    /// contiguity, and non-rest days having at least one exercise
    pub fn validate_structure(&self) -> AppResult<()> {
        for meso in &self.mesocycles {
            for micro in &meso.microcycles {
                let mut seen_days = std::collections::HashSet::new();
                for day in &micro.training_days {
                    if day.day_number < 1 || day.day_number > 14 {
                        return Err(AppError::constraint_violation(format!(
                            "day_number {} outside 1-14 in '{}'",
                            day.day_number, micro.name
                        )));
                    }
                    if !seen_days.insert(day.day_number) {
                        return Err(AppError::constraint_violation(format!(
                            "duplicate day_number {} in '{}'",
                            day.day_number, micro.name
                        )));
                    }
                    if !day.rest_day && day.exercises.is_empty() {
                        return Err(AppError::constraint_violation(format!(
                            "non-rest day '{}' has no exercises",
                            day.name
                        )));
                    }
                    for (idx, exercise) in day.exercises.iter().enumerate() {
                        if exercise.order_index != idx as u32 {
                            return Err(AppError::constraint_violation(format!(
                                "order_index gap at position {idx} in '{}'",
                                day.name
                            )));
                        }
                        exercise.validate()?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Narrative explanation attached to a generated program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramExplanation {
    /// Why the program was designed this way
    #[serde(default)]
    pub rationale: String,
    /// How the program progresses week to week
    #[serde(default)]
    pub progression_strategy: String,
    /// Deload placement strategy, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deload_strategy: Option<String>,
    /// How volume is distributed across the week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_distribution: Option<String>,
    /// Practical tips for running the program
    #[serde(default)]
    pub tips: Vec<String>,
}

// ============================================================================
// Generation Request
// ============================================================================

/// Basic user profile from the questionnaire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Experience level
    pub fitness_level: FitnessLevel,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Months of structured training history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_experience_months: Option<u32>,
}

/// Training goals from the questionnaire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingGoals {
    /// Primary objective
    pub primary_goal: PrimaryGoal,
    /// Free-text secondary goals
    #[serde(default)]
    pub specific_goals: Vec<String>,
    /// Muscle groups to emphasize
    #[serde(default)]
    pub target_muscle_groups: Vec<MuscleGroup>,
}

/// Weekly availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    /// Training days per week (1-7)
    pub days_per_week: u32,
    /// Session length in minutes
    pub session_duration_minutes: u32,
}

/// Equipment access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentAccess {
    /// Whether the user trains at a commercial gym
    pub has_gym_access: bool,
    /// Equipment available to the user
    #[serde(default)]
    pub available_equipment: Vec<EquipmentType>,
}

/// Restrictions and limitations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Restrictions {
    /// Current or past injuries
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Exercise names to exclude (case-insensitive substring match)
    #[serde(default)]
    pub excluded_exercises: Vec<String>,
}

/// Training preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Include cardio work
    #[serde(default)]
    pub include_cardio: bool,
    /// Include warmup exercises
    #[serde(default = "default_true")]
    pub include_warmup: bool,
    /// Include cooldown exercises
    #[serde(default)]
    pub include_cooldown: bool,
}

const fn default_true() -> bool {
    true
}

// Documented defaults for fields the compact payload may omit
const fn default_phase() -> ExercisePhase {
    ExercisePhase::Main
}

const fn default_exercise_class() -> ExerciseClass {
    ExerciseClass::Strength
}

const fn default_sets() -> u32 {
    3
}

const fn default_rest_seconds() -> u32 {
    90
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            include_cardio: false,
            include_warmup: true,
            include_cooldown: false,
        }
    }
}

/// Requested program shape and dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDuration {
    /// Total program length in weeks (1-52)
    pub total_weeks: u32,
    /// Weeks per mesocycle (1-8)
    pub mesocycle_weeks: u32,
    /// Whether deload weeks are allowed
    #[serde(default = "default_true")]
    pub include_deload: bool,
    /// First calendar day of the program
    pub start_date: NaiveDate,
}

/// Complete questionnaire input for one generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRequest {
    /// User profile
    pub user_profile: UserProfile,
    /// Goals
    pub goals: TrainingGoals,
    /// Availability
    pub availability: Availability,
    /// Equipment access
    pub equipment: EquipmentAccess,
    /// Restrictions, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
    /// Preferences, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    /// Program shape and start date
    pub program_duration: ProgramDuration,
}

impl WorkoutRequest {
    /// One-week variant of this request used for fast previews
    #[must_use]
    pub fn preview(&self) -> Self {
        let mut request = self.clone();
        request.program_duration.total_weeks = 1;
        request.program_duration.mesocycle_weeks = 1;
        request
    }
}

// ============================================================================
// Generation Response
// ============================================================================

/// Caller-facing result of one generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutResponse {
    /// Whether a program was produced
    pub success: bool,
    /// The generated program, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macrocycle: Option<Macrocycle>,
    /// Narrative explanation, present on success when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ProgramExplanation>,
    /// Non-fatal warnings (catalog mismatches, session overloads)
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Error message, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkoutResponse {
    /// Failed response with an error message
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            macrocycle: None,
            explanation: None,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Successful response carrying a program
    #[must_use]
    pub fn success(
        macrocycle: Macrocycle,
        explanation: Option<ProgramExplanation>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            macrocycle: Some(macrocycle),
            explanation,
            warnings,
            error: None,
        }
    }
}
