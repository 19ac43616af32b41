// ABOUTME: Relevance scoring and bounding of the exercise catalog for generation
// ABOUTME: Pure filter producing a capped candidate list ordered by priority
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Catalog Filter
//!
//! Scores and bounds the exercise catalog before it is rendered into the
//! generator prompt. Pure function of the snapshot and the request: no side
//! effects, no catalog mutation.
//!
//! Filtering drops entries excluded by name, entries requiring unavailable
//! equipment, and advanced-only entries for beginners. Surviving entries get
//! priority 3 when their primary muscles intersect the user's target set,
//! priority 2 when their movement class matches the goal's preference table,
//! and priority 1 otherwise; a stable descending sort plus a hard cap keeps
//! the candidate list bounded.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::{
    CatalogExercise, Difficulty, ExerciseCatalog, FitnessLevel, PrimaryGoal, WorkoutRequest,
};

/// Hard cap on candidates handed to the generator
pub const CANDIDATE_CAP: usize = 80;

/// Movement classes preferred for a goal; entries outside the table still
/// pass at priority 1 for variety
fn preferred_movement_classes(goal: PrimaryGoal) -> &'static [&'static str] {
    match goal {
        PrimaryGoal::Hypertrophy | PrimaryGoal::GeneralFitness => {
            &["multiarticular", "monoarticular"]
        }
        PrimaryGoal::Strength | PrimaryGoal::Power => &["multiarticular"],
        PrimaryGoal::Endurance => &["multiarticular", "monoarticular", "cardio"],
        PrimaryGoal::FatLoss => &["multiarticular", "cardio"],
    }
}

/// Bounded, relevance-ordered catalog filter
#[derive(Debug, Clone, Copy)]
pub struct CatalogFilter {
    cap: usize,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::new(CANDIDATE_CAP)
    }
}

impl CatalogFilter {
    /// Create a filter with a custom candidate cap
    #[must_use]
    pub const fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Produce the bounded candidate list for one request.
    ///
    /// The returned slice borrows from the catalog snapshot and preserves
    /// catalog order within each priority tier (stable sort).
    #[must_use]
    pub fn filter<'a>(
        &self,
        catalog: &'a ExerciseCatalog,
        request: &WorkoutRequest,
    ) -> Vec<&'a CatalogExercise> {
        let excluded: Vec<String> = request
            .restrictions
            .as_ref()
            .map(|restrictions| {
                restrictions
                    .excluded_exercises
                    .iter()
                    .map(|name| name.to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        let mut available: HashSet<&str> = request
            .equipment
            .available_equipment
            .iter()
            .map(|equipment| equipment.as_str())
            .collect();
        if request.equipment.has_gym_access {
            for equipment in crate::models::EquipmentType::gym_equipment() {
                available.insert(equipment.as_str());
            }
        }

        let targets: HashSet<&str> = request
            .goals
            .target_muscle_groups
            .iter()
            .map(|muscle| muscle.as_str())
            .collect();

        let preferred = preferred_movement_classes(request.goals.primary_goal);
        let level = request.user_profile.fitness_level;

        let mut candidates: Vec<(u8, &CatalogExercise)> = catalog
            .exercises()
            .iter()
            .filter(|exercise| {
                let name = exercise.name.to_lowercase();
                if excluded.iter().any(|term| name.contains(term)) {
                    return false;
                }
                let equipment = exercise.equipment.to_lowercase();
                if equipment != "bodyweight"
                    && equipment != "none"
                    && !available.contains(equipment.as_str())
                {
                    return false;
                }
                if level == FitnessLevel::Beginner && exercise.difficulty == Difficulty::Advanced {
                    return false;
                }
                true
            })
            .map(|exercise| (Self::priority(exercise, &targets, preferred), exercise))
            .collect();

        candidates.sort_by_key(|&(priority, _)| Reverse(priority));
        candidates.truncate(self.cap);
        candidates
            .into_iter()
            .map(|(_, exercise)| exercise)
            .collect()
    }

    fn priority(
        exercise: &CatalogExercise,
        targets: &HashSet<&str>,
        preferred: &[&str],
    ) -> u8 {
        if !targets.is_empty()
            && exercise
                .primary_muscles
                .iter()
                .any(|muscle| targets.contains(muscle.to_lowercase().as_str()))
        {
            return 3;
        }
        let class = exercise.movement_class.to_lowercase();
        // Cardio stays selectable for conditioning work under every goal
        if preferred.contains(&class.as_str()) || class == "cardio" {
            return 2;
        }
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Availability, EquipmentAccess, EquipmentType, MuscleGroup, ProgramDuration, Restrictions,
        TrainingGoals, UserProfile,
    };
    use chrono::NaiveDate;

    fn entry(id: &str, name: &str, class: &str, muscles: &[&str], equipment: &str) -> CatalogExercise {
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

    fn request(level: FitnessLevel, goal: PrimaryGoal) -> WorkoutRequest {
        WorkoutRequest {
            user_profile: UserProfile {
                fitness_level: level,
                age: None,
                weight_kg: None,
                height_cm: None,
                training_experience_months: None,
            },
            goals: TrainingGoals {
                primary_goal: goal,
                specific_goals: Vec::new(),
                target_muscle_groups: vec![MuscleGroup::Chest],
            },
            availability: Availability {
                days_per_week: 4,
                session_duration_minutes: 60,
            },
            equipment: EquipmentAccess {
                has_gym_access: false,
                available_equipment: vec![EquipmentType::Dumbbells],
            },
            restrictions: Some(Restrictions {
                injuries: Vec::new(),
                excluded_exercises: vec!["deadlift".into()],
            }),
            preferences: None,
            program_duration: ProgramDuration {
                total_weeks: 8,
                mesocycle_weeks: 4,
                include_deload: true,
                start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            },
        }
    }

    #[test]
    fn test_excluded_names_are_dropped() {
        let catalog = ExerciseCatalog::new(vec![
            entry("1", "Romanian Deadlift", "multiarticular", &["legs"], "bodyweight"),
            entry("2", "Dumbbell Row", "multiarticular", &["back"], "dumbbells"),
        ]);
        let filter = CatalogFilter::default();
        let result = filter.filter(&catalog, &request(FitnessLevel::Intermediate, PrimaryGoal::Strength));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_unavailable_equipment_is_dropped_but_bodyweight_passes() {
        let catalog = ExerciseCatalog::new(vec![
            entry("1", "Barbell Squat", "multiarticular", &["legs"], "barbell"),
            entry("2", "Push Up", "multiarticular", &["chest"], "bodyweight"),
        ]);
        let filter = CatalogFilter::default();
        let result = filter.filter(&catalog, &request(FitnessLevel::Intermediate, PrimaryGoal::Strength));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Push Up");
    }

    #[test]
    fn test_gym_access_expands_equipment() {
        let catalog = ExerciseCatalog::new(vec![entry(
            "1",
            "Barbell Squat",
            "multiarticular",
            &["legs"],
            "barbell",
        )]);
        let mut req = request(FitnessLevel::Intermediate, PrimaryGoal::Strength);
        req.equipment.has_gym_access = true;
        let result = CatalogFilter::default().filter(&catalog, &req);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_advanced_entries_dropped_for_beginners() {
        let mut advanced = entry("1", "Muscle Up", "multiarticular", &["back"], "bodyweight");
        advanced.difficulty = Difficulty::Advanced;
        let catalog = ExerciseCatalog::new(vec![
            advanced,
            entry("2", "Push Up", "multiarticular", &["chest"], "bodyweight"),
        ]);
        let result = CatalogFilter::default()
            .filter(&catalog, &request(FitnessLevel::Beginner, PrimaryGoal::GeneralFitness));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Push Up");
    }

    #[test]
    fn test_target_muscles_rank_first() {
        let catalog = ExerciseCatalog::new(vec![
            entry("1", "Goblet Squat", "multiarticular", &["legs"], "dumbbells"),
            entry("2", "Dumbbell Bench Press", "multiarticular", &["chest"], "dumbbells"),
            entry("3", "Wrist Curl", "monoarticular", &["forearms"], "dumbbells"),
        ]);
        let result = CatalogFilter::default()
            .filter(&catalog, &request(FitnessLevel::Intermediate, PrimaryGoal::Strength));
        // chest target first (priority 3), preferred multiarticular second,
        // off-table monoarticular last
        assert_eq!(result[0].id, "2");
        assert_eq!(result[1].id, "1");
        assert_eq!(result[2].id, "3");
    }

    #[test]
    fn test_cap_truncates_candidates() {
        let exercises: Vec<CatalogExercise> = (0..120)
            .map(|i| {
                entry(
                    &format!("ex-{i}"),
                    &format!("Curl Variation {i}"),
                    "monoarticular",
                    &["arms"],
                    "dumbbells",
                )
            })
            .collect();
        let catalog = ExerciseCatalog::new(exercises);
        let result = CatalogFilter::default()
            .filter(&catalog, &request(FitnessLevel::Intermediate, PrimaryGoal::Hypertrophy));
        assert_eq!(result.len(), CANDIDATE_CAP);
    }
}
