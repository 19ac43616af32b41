// ABOUTME: Prompt assembly for program generation
// ABOUTME: Splits every prompt into a cacheable preamble and a request-specific suffix

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Prompt Assembly
//!
//! Builds the text segments sent to the generation service. Every assembled
//! prompt is a cacheable preamble (coaching system prompt + filtered catalog
//! + output schema) followed by a request-specific suffix (user context,
//! constraints, task). The preamble stays byte-identical across the calls of
//! one request so the provider can serve it from cache on the second call of
//! a phased generation.

use std::fmt::Write as _;

use serde_json::Value;

use super::PromptSegment;
use crate::models::{CatalogExercise, FitnessLevel, PrimaryGoal, WorkoutRequest};

/// Coaching role, programming principles, and per-class parametrization rules
pub const SYSTEM_PROMPT: &str = "\
You are a certified personal trainer and programming expert with over 15 years \
of experience designing evidence-based training programs.

## PRINCIPLES YOU MUST FOLLOW:

### 1. Periodization
- Organize training into blocks with a specific objective each
- Alternate accumulation (volume) and intensification (intensity) phases
- Schedule a deload week after every 3-4 weeks of hard training
- Undulate intensity inside each mesocycle

### 2. Progressive Overload
- Increase volume or intensity gradually
- Use rep ranges appropriate for the objective
- Adjust effort (RIR/RPE) to the mesocycle phase

### 3. Specificity
- Select exercises that hit the target muscle groups
- Build sessions on multi-joint movements
- Add single-joint work for targeted emphasis

### 4. Recovery
- Allow 48-72 hours between sessions for the same muscle group
- Scale total volume to recovery capacity
- Rest days are part of the program

### 5. Individualization
- Match the program to the user's experience level
- Respect physical restrictions and limitations
- Respect time and equipment availability

## REFERENCE RANGES PER OBJECTIVE:

| Objective | Sets/muscle/week | Reps | RIR | Rest |
|-----------|------------------|------|-----|------|
| Hypertrophy | 10-20 | 6-12 | 1-3 | 60-90s |
| Strength | 6-12 | 3-6 | 2-4 | 2-3min |
| Power | 4-8 | 1-5 | 3-5 | 3-5min |
| Endurance | 12-20 | 12-20+ | 1-2 | 30-60s |
| Fat loss | 10-15 | 8-15 | 2-3 | 45-60s |
| General fitness | 8-12 | 8-12 | 2-3 | 60-90s |

## RECOMMENDED WEEKLY SPLITS:

- 2 days/week: Full Body x2
- 3 days/week: Full Body x3 or Push/Pull/Legs
- 4 days/week: Upper/Lower x2 or Push/Pull/Legs + Full Body
- 5 days/week: Upper/Lower/Push/Pull/Legs
- 6 days/week: Push/Pull/Legs x2

## EXERCISE CLASSES:

Every exercise has a CLASS that determines how it is parametrized:

### STRENGTH
- Use reps_min/reps_max (typically 1-20)
- Effort: RIR or RPE (0-5)
- Include tempo when relevant

### CARDIO
- Use duration_seconds (NOT reps)
- Sub-classes:
  - **LISS**: 1200-3600s (20-60 min), HR zone 1-2, low effort
  - **HIIT**: 600-1800s (10-30 min), HR zone 4-5, intervals
  - **MISS**: 1200-1800s (20-30 min), HR zone 2-3, moderate
- Set intensity_zone (iz) 1-5 for the heart-rate zone

### PLYOMETRIC
- Low sets (2-4), low reps (3-8), long rests (2-3 min), high RIR (3-5)

### FLEXIBILITY
- Use duration_seconds for stretches; no measured effort; short rests

### MOBILITY
- Use duration_seconds or reps; low effort; range-of-motion focus

### WARMUP
- Low volume, no measured effort, session preparation

### CONDITIONING
- High intensity, moderate volume; duration_seconds or reps as fits

### BALANCE
- Low volume, technique focus; duration_seconds for static holds";

/// Compact output schema with the key table and per-class examples
pub const COMPRESSED_SCHEMA: &str = r#"## COMPRESSED RESPONSE FORMAT

To SAVE TOKENS, use this compact format:

```json
{
  "m": {
    "n": "Program name",
    "d": "Short description",
    "o": "hypertrophy",
    "ms": [
      {
        "b": 1,
        "n": "Phase 1",
        "f": "Accumulation",
        "mc": [
          {
            "w": 1,
            "n": "Week 1",
            "i": "medium",
            "td": [
              {
                "d": 1,
                "n": "Push",
                "f": "Chest/Shoulders/Triceps",
                "r": false,
                "ex": [
                  {"id": "uuid", "s": 3, "rm": 8, "rx": 12, "rs": 90, "et": "RIR", "ev": 2, "ph": "main"},
                  {"id": "uuid", "s": 2, "ds": 300, "rs": 0, "et": "RPE", "ev": 3, "ec": "warmup", "ph": "warmup"}
                ]
              }
            ]
          }
        ]
      }
    ]
  },
  "e": {
    "r": "Short rationale",
    "p": "Progression strategy",
    "t": ["Tip 1"]
  }
}
```

## KEYS:
- m=macrocycle, n=name, d=description, o=objective
- ms=mesocycles, b=block_number, f=focus
- mc=microcycles, w=week_number, i=intensity_level
- td=training_days, r=rest_day, ex=exercises
- id=exercise_id, s=sets, rm=reps_min, rx=reps_max
- rs=rest_seconds, et=effort_type, ev=effort_value
- ds=duration_seconds (for cardio), t=tempo, nt=notes
- ec=exercise_class (strength, cardio, plyometric, ...)
- cs=cardio_subclass (liss, hiit, miss) - cardio only
- iz=intensity_zone (1-5) - HR zone for cardio
- ph=phase (warmup, main, cooldown)
- e=explanation, p=progression, t=tips

## RULES:
1. **id**: MUST be an exact catalog id
2. Cardio: use "ds" (duration_seconds), omit rm/rx, include "cs" and "iz"
3. Strength: use "rm/rx" (reps), omit ds
4. Only include fields with a value (omit nulls)
5. NO extra text, JSON only"#;

/// Canonical output schema, used when compressed output is disabled
pub const CANONICAL_SCHEMA: &str = r#"## RESPONSE FORMAT

Respond with a single JSON object using canonical field names:

```json
{
  "macrocycle": {
    "name": "Program name",
    "description": "Short description",
    "objective": "hypertrophy",
    "mesocycles": [
      {
        "block_number": 1,
        "name": "Phase 1",
        "focus": "Accumulation",
        "microcycles": [
          {
            "week_number": 1,
            "name": "Week 1",
            "intensity_level": "medium",
            "training_days": [
              {
                "day_number": 1,
                "name": "Push",
                "focus": "Chest/Shoulders/Triceps",
                "rest_day": false,
                "exercises": [
                  {
                    "exercise_id": "uuid",
                    "exercise_name": "Bench Press",
                    "order_index": 0,
                    "phase": "main",
                    "sets": 3,
                    "reps_min": 8,
                    "reps_max": 12,
                    "rest_seconds": 90,
                    "effort_type": "RIR",
                    "effort_value": 2
                  }
                ]
              }
            ]
          }
        ]
      }
    ]
  },
  "explanation": {
    "rationale": "Short rationale",
    "progression_strategy": "Progression strategy",
    "tips": ["Tip 1"]
  }
}
```

## RULES:
1. **exercise_id**: MUST be an exact catalog id
2. Cardio: use duration_seconds, omit reps_min/reps_max
3. Strength: use reps_min/reps_max, omit duration_seconds
4. Only include fields with a value (omit nulls)
5. NO extra text, JSON only"#;

// ============================================================================
// Request-specific sections
// ============================================================================

/// Readable goal description for the prompt
fn describe_goal(goal: PrimaryGoal) -> &'static str {
    match goal {
        PrimaryGoal::Hypertrophy => "Hypertrophy (muscle growth)",
        PrimaryGoal::Strength => "Maximal strength",
        PrimaryGoal::Power => "Power and explosiveness",
        PrimaryGoal::Endurance => "Muscular endurance",
        PrimaryGoal::FatLoss => "Fat loss",
        PrimaryGoal::GeneralFitness => "General fitness and health",
    }
}

/// Weekly sets-per-muscle recommendation scaled by level
#[must_use]
pub fn volume_recommendation(goal: PrimaryGoal, level: FitnessLevel) -> (u32, u32) {
    let (min, max) = match goal {
        PrimaryGoal::Hypertrophy => (10, 20),
        PrimaryGoal::Strength => (6, 12),
        PrimaryGoal::Power => (4, 8),
        PrimaryGoal::Endurance => (12, 20),
        PrimaryGoal::FatLoss => (10, 15),
        PrimaryGoal::GeneralFitness => (8, 12),
    };
    let (num, den) = match level {
        FitnessLevel::Beginner => (7, 10),
        FitnessLevel::Intermediate => (10, 10),
        FitnessLevel::Advanced => (12, 10),
    };
    (min * num / den, max * num / den)
}

/// User questionnaire rendered as a context block
#[must_use]
pub fn user_context(request: &WorkoutRequest) -> String {
    let profile = &request.user_profile;
    let goals = &request.goals;
    let duration = &request.program_duration;
    let mut out = String::new();

    out.push_str("## USER PROFILE\n");
    let _ = writeln!(out, "- Fitness level: {}", profile.fitness_level);
    if let Some(age) = profile.age {
        let _ = writeln!(out, "- Age: {age} years");
    }
    if let Some(weight) = profile.weight_kg {
        let _ = writeln!(out, "- Weight: {weight} kg");
    }
    if let Some(height) = profile.height_cm {
        let _ = writeln!(out, "- Height: {height} cm");
    }
    if let Some(months) = profile.training_experience_months {
        let _ = writeln!(
            out,
            "- Training experience: {} years and {} months",
            months / 12,
            months % 12
        );
    }

    out.push_str("\n## GOALS\n");
    let _ = writeln!(out, "- Primary goal: {}", describe_goal(goals.primary_goal));
    if !goals.specific_goals.is_empty() {
        let _ = writeln!(out, "- Specific goals: {}", goals.specific_goals.join(", "));
    }
    if !goals.target_muscle_groups.is_empty() {
        let muscles: Vec<&str> = goals
            .target_muscle_groups
            .iter()
            .map(|m| m.as_str())
            .collect();
        let _ = writeln!(out, "- Muscle groups to emphasize: {}", muscles.join(", "));
    }

    out.push_str("\n## AVAILABILITY\n");
    let _ = writeln!(out, "- Days per week: {}", request.availability.days_per_week);
    let _ = writeln!(
        out,
        "- Session duration: {} minutes",
        request.availability.session_duration_minutes
    );

    out.push_str("\n## EQUIPMENT\n");
    let _ = writeln!(
        out,
        "- Gym access: {}",
        if request.equipment.has_gym_access { "yes" } else { "no" }
    );
    let equipment: Vec<&str> = request
        .equipment
        .available_equipment
        .iter()
        .map(|e| e.as_str())
        .collect();
    let _ = writeln!(out, "- Available equipment: {}", equipment.join(", "));

    if let Some(restrictions) = &request.restrictions {
        if !restrictions.injuries.is_empty() || !restrictions.excluded_exercises.is_empty() {
            out.push_str("\n## RESTRICTIONS\n");
            if !restrictions.injuries.is_empty() {
                let _ = writeln!(out, "- Injuries: {}", restrictions.injuries.join(", "));
            }
            if !restrictions.excluded_exercises.is_empty() {
                let _ = writeln!(
                    out,
                    "- Exercises to avoid: {}",
                    restrictions.excluded_exercises.join(", ")
                );
            }
        }
    }

    if let Some(preferences) = &request.preferences {
        out.push_str("\n## PREFERENCES\n");
        let _ = writeln!(
            out,
            "- Include cardio: {}",
            if preferences.include_cardio { "yes" } else { "no" }
        );
        let _ = writeln!(
            out,
            "- Include warmup: {}",
            if preferences.include_warmup { "yes" } else { "no" }
        );
        let _ = writeln!(
            out,
            "- Include cooldown: {}",
            if preferences.include_cooldown { "yes" } else { "no" }
        );
    }

    out.push_str("\n## PROGRAM DURATION\n");
    let _ = writeln!(out, "- Total length: {} weeks", duration.total_weeks);
    let _ = writeln!(out, "- Mesocycle length: {} weeks", duration.mesocycle_weeks);
    let _ = writeln!(
        out,
        "- Include deload weeks: {}",
        if duration.include_deload { "yes" } else { "no" }
    );
    let _ = writeln!(out, "- Start date: {}", duration.start_date);

    out
}

/// Filtered candidate list rendered as a compact catalog, grouped by
/// movement class
#[must_use]
pub fn catalog_block(candidates: &[&CatalogExercise]) -> String {
    if candidates.is_empty() {
        return "## EXERCISE CATALOG\n\nNo exercises available.".to_owned();
    }

    let mut out = format!("## CATALOG ({} filtered exercises)\n", candidates.len());
    out.push_str("**Only use exercises from this catalog, with their exact id.**\n");

    let mut classes: Vec<&str> = candidates
        .iter()
        .map(|exercise| exercise.movement_class.as_str())
        .collect();
    classes.sort_unstable();
    classes.dedup();

    for class in classes {
        let _ = write!(out, "\n### {}\n", class.to_uppercase());
        for exercise in candidates
            .iter()
            .filter(|e| e.movement_class == class)
        {
            let muscles = if exercise.primary_muscles.is_empty() {
                String::new()
            } else {
                format!(
                    " [{}]",
                    exercise.primary_muscles[..exercise.primary_muscles.len().min(2)].join(", ")
                )
            };
            let subclass_tag = exercise
                .cardio_subclass
                .map(|subclass| format!(" ({subclass:?})").to_lowercase())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "- {} (`{}`){subclass_tag}{muscles}",
                exercise.name, exercise.id
            );
        }
    }

    out
}

/// Per-request generation constraints, including computed volume bounds
#[must_use]
pub fn constraints(request: &WorkoutRequest) -> String {
    let level = request.user_profile.fitness_level;
    let goal = request.goals.primary_goal;
    let mut out = String::from("## GENERATION CONSTRAINTS\n");

    out.push_str(
        "\n### Scope of this generation (1 microcycle):\n\
         - Generate ONLY 1 microcycle in this response (no extra progressions).\n\
         - Use consecutive `day_number` values (1..N). You may extend past 7 days \
         for extra recovery; do not start a second microcycle.\n\
         - Keep at least 24h between sessions and 48h between sessions for the \
         same muscle group.\n\
         - Include at least 1 rest day after every 3 consecutive sessions.\n",
    );

    let (volume_min, volume_max) = volume_recommendation(goal, level);
    let (session_min, session_max) = match level {
        FitnessLevel::Beginner => (3, 4),
        FitnessLevel::Intermediate => (4, 6),
        FitnessLevel::Advanced => (5, 8),
    };
    let _ = write!(
        out,
        "\n### Computed Volume Bounds (goal: {goal}, level: {level}):\n\
         - Sets per muscle group per week: {volume_min}-{volume_max}\n\
         - Exercises per session: {session_min}-{session_max} (MANDATORY)\n\
         - **IMPORTANT**: respect the per-session exercise bounds strictly\n"
    );

    match level {
        FitnessLevel::Beginner => out.push_str(
            "\n### Beginner Constraints:\n\
             - Prioritize basic, safe exercises\n\
             - Minimum RIR of 3 (never to failure)\n\
             - Avoid technically complex lifts\n\
             - Focus on fundamental movement patterns\n",
        ),
        FitnessLevel::Intermediate => out.push_str(
            "\n### Intermediate Constraints:\n\
             - Include exercise variety\n\
             - RIR 1-3 depending on the mesocycle phase\n\
             - More technical lifts are allowed\n\
             - Balance compound and isolation work\n",
        ),
        FitnessLevel::Advanced => out.push_str(
            "\n### Advanced Constraints:\n\
             - Full variety and advanced techniques allowed\n\
             - RIR 0-2 in intensification phases\n\
             - Supersets and intensity techniques are allowed\n",
        ),
    }

    let minutes = request.availability.session_duration_minutes;
    if minutes < 45 {
        let _ = write!(
            out,
            "\n### Time Constraints ({minutes} min):\n\
             - Maximum 4 exercises per session\n\
             - Short rests (60-90 seconds maximum)\n\
             - Prioritize compound lifts\n"
        );
    } else if minutes < 60 {
        let _ = write!(
            out,
            "\n### Time Constraints ({minutes} min):\n\
             - Maximum 5-6 exercises per session\n\
             - Moderate rests\n"
        );
    }

    if !request.equipment.has_gym_access {
        out.push_str(
            "\n### Equipment Constraints (no gym):\n\
             - Only use exercises matching the available equipment\n\
             - Prefer home-friendly variations where possible\n",
        );
    }

    out
}

/// Task block for the base-week call of a phased generation
#[must_use]
pub fn base_week_task(request: &WorkoutRequest) -> String {
    format!(
        "## TASK: GENERATE BASE WEEK\n\n\
         Generate ONE complete, detailed training week to serve as the BASE of \
         the program.\n\n\
         This week must include:\n\
         1. Day distribution matching availability ({} days)\n\
         2. Optimal exercise selection for each day\n\
         3. Starting volume appropriate for the level ({})\n\
         4. Starting intensity (conservative RIR for week 1)\n\n\
         The response will be used as a TEMPLATE to derive the remaining weeks \
         through automatic progression.\n\n\
         Respond ONLY with JSON in the compressed format.",
        request.availability.days_per_week, request.user_profile.fitness_level
    )
}

/// Task block for the progression-matrix call of a phased generation
#[must_use]
pub fn progression_task(base_week: &Value, total_weeks: u32) -> String {
    format!(
        "## TASK: GENERATE PROGRESSION MATRIX\n\n\
         You already produced the BASE WEEK. Now emit ONLY the parameter changes \
         for weeks 2-{total_weeks}.\n\n\
         Base week (reference):\n{base_week:#}\n\n\
         For each subsequent week, list only the changes relative to the base week:\n\
         - Set increments (when applicable)\n\
         - RIR/RPE adjustments per phase\n\
         - Intensity tags (low/medium/high/deload)\n\n\
         Response format:\n\
         ```json\n\
         {{\n\
           \"progression\": [\n\
             {{\"week\": 2, \"intensity\": \"medium\", \"changes\": [\n\
               {{\"day\": 1, \"ex_idx\": 0, \"s\": 4, \"ev\": 2}}\n\
             ]}}\n\
           ],\n\
           \"deload_weeks\": [4, 8]\n\
         }}\n\
         ```\n\n\
         RULES:\n\
         - Only list exercises that CHANGE (omit ones keeping base values)\n\
         - \"s\" = sets, \"ev\" = effort_value, \"rm/rx\" = reps, \"rs\" = rest_seconds\n\
         - Deload weeks: cut volume 40-50%\n\
         - Undulating intensity: low -> medium -> high -> deload\n\n\
         Respond ONLY with JSON."
    )
}

// ============================================================================
// Assembly
// ============================================================================

/// Shared cacheable preamble: system prompt + catalog + output schema
fn preamble(candidates: &[&CatalogExercise], compressed: bool) -> String {
    let schema = if compressed {
        COMPRESSED_SCHEMA
    } else {
        CANONICAL_SCHEMA
    };
    format!(
        "{SYSTEM_PROMPT}\n\n{}\n\n{schema}",
        catalog_block(candidates)
    )
}

fn single_call_suffix(request: &WorkoutRequest) -> String {
    format!(
        "{}\n\n{}\n\n## TASK\n\
         Generate ONLY ONE training microcycle (1 block) for this user.\n\
         If you need more than 7 days to respect recovery, extend `day_number` \
         consecutively.\n\
         Start the microcycle on {} and respect the minimum rests above.\n\n\
         Respond ONLY with the JSON, no extra text.",
        user_context(request),
        constraints(request),
        request.program_duration.start_date
    )
}

/// Cached single-call prompt: cacheable preamble + specific suffix
#[must_use]
pub fn assemble_optimized(
    request: &WorkoutRequest,
    candidates: &[&CatalogExercise],
    compressed: bool,
) -> Vec<PromptSegment> {
    vec![
        PromptSegment::cacheable(preamble(candidates, compressed)),
        PromptSegment::specific(single_call_suffix(request)),
    ]
}

/// Direct fallback prompt: one uncached segment
#[must_use]
pub fn assemble_direct(
    request: &WorkoutRequest,
    candidates: &[&CatalogExercise],
    compressed: bool,
) -> Vec<PromptSegment> {
    vec![PromptSegment::specific(format!(
        "{}\n\n{}",
        preamble(candidates, compressed),
        single_call_suffix(request)
    ))]
}

/// Phase-1 prompt of a phased generation: base week only
#[must_use]
pub fn assemble_base_week(
    request: &WorkoutRequest,
    candidates: &[&CatalogExercise],
) -> Vec<PromptSegment> {
    vec![
        PromptSegment::cacheable(preamble(candidates, true)),
        PromptSegment::specific(format!(
            "{}\n\n{}\n\n{}",
            user_context(request),
            constraints(request),
            base_week_task(request)
        )),
    ]
}

/// Phase-2 prompt of a phased generation: progression matrix. Reuses the
/// phase-1 preamble byte for byte so it is served from cache.
#[must_use]
pub fn assemble_progression(
    candidates: &[&CatalogExercise],
    base_week: &Value,
    total_weeks: u32,
) -> Vec<PromptSegment> {
    vec![
        PromptSegment::cacheable(preamble(candidates, true)),
        PromptSegment::specific(progression_task(base_week, total_weeks)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Availability, Difficulty, EquipmentAccess, EquipmentType, MuscleGroup, ProgramDuration,
        TrainingGoals, UserProfile,
    };
    use chrono::NaiveDate;

    fn request() -> WorkoutRequest {
        WorkoutRequest {
            user_profile: UserProfile {
                fitness_level: FitnessLevel::Intermediate,
                age: Some(31),
                weight_kg: None,
                height_cm: None,
                training_experience_months: Some(30),
            },
            goals: TrainingGoals {
                primary_goal: PrimaryGoal::Hypertrophy,
                specific_goals: Vec::new(),
                target_muscle_groups: vec![MuscleGroup::Back],
            },
            availability: Availability {
                days_per_week: 4,
                session_duration_minutes: 60,
            },
            equipment: EquipmentAccess {
                has_gym_access: true,
                available_equipment: vec![EquipmentType::Dumbbells],
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

    fn candidate() -> CatalogExercise {
        CatalogExercise {
            id: "ex-1".into(),
            name: "Barbell Row".into(),
            movement_class: "multiarticular".into(),
            primary_muscles: vec!["back".into(), "biceps".into(), "forearms".into()],
            secondary_muscles: Vec::new(),
            equipment: "barbell".into(),
            difficulty: Difficulty::Intermediate,
            cardio_subclass: None,
        }
    }

    #[test]
    fn test_catalog_block_lists_ids_and_truncates_muscles() {
        let entry = candidate();
        let block = catalog_block(&[&entry]);
        assert!(block.contains("`ex-1`"));
        assert!(block.contains("[back, biceps]"));
        assert!(!block.contains("forearms"));
        assert!(block.contains("MULTIARTICULAR"));
    }

    #[test]
    fn test_volume_recommendation_scales_by_level() {
        assert_eq!(
            volume_recommendation(PrimaryGoal::Hypertrophy, FitnessLevel::Beginner),
            (7, 14)
        );
        assert_eq!(
            volume_recommendation(PrimaryGoal::Hypertrophy, FitnessLevel::Advanced),
            (12, 24)
        );
    }

    #[test]
    fn test_optimized_assembly_splits_cacheable_and_specific() {
        let entry = candidate();
        let segments = assemble_optimized(&request(), &[&entry], true);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].cacheable);
        assert!(segments[0].text.contains("COMPRESSED RESPONSE FORMAT"));
        assert!(!segments[1].cacheable);
        assert!(segments[1].text.contains("USER PROFILE"));
        assert!(segments[1].text.contains("2025-06-02"));
    }

    #[test]
    fn test_phased_prompts_share_the_preamble() {
        let entry = candidate();
        let req = request();
        let base = assemble_base_week(&req, &[&entry]);
        let progression =
            assemble_progression(&[&entry], &serde_json::json!({"m": {}}), 8);
        // Byte-identical preamble keeps the provider cache warm
        assert_eq!(base[0].text, progression[0].text);
        assert!(progression[1].text.contains("weeks 2-8"));
    }

    #[test]
    fn test_constraints_reflect_level_and_time() {
        let mut req = request();
        req.user_profile.fitness_level = FitnessLevel::Beginner;
        req.availability.session_duration_minutes = 40;
        let text = constraints(&req);
        assert!(text.contains("Exercises per session: 3-4"));
        assert!(text.contains("Beginner Constraints"));
        assert!(text.contains("Time Constraints (40 min)"));
    }
}
