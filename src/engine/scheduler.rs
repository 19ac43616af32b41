// ABOUTME: Calendar assignment over an expanded program
// ABOUTME: Walks mesocycles and microcycles assigning start/end dates and per-day dates

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Training

//! # Date Scheduler
//!
//! Populates `start_date`/`end_date` at every level of an expanded program
//! plus a concrete date on every training day. A microcycle's length in days
//! is the maximum `day_number` among its training days, which supports
//! extended non-7-day microcycles; the next microcycle starts the day after
//! the previous one ends.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::models::Macrocycle;

/// Calendar walker for expanded programs
#[derive(Debug, Clone, Copy, Default)]
pub struct DateScheduler;

impl DateScheduler {
    /// Assign dates in place, starting the program on `start_date`.
    ///
    /// `fallback_weeks` sizes a mesocycle that carries no microcycles at
    /// `fallback_weeks * 7` days so the walk stays monotonic.
    pub fn schedule(program: &mut Macrocycle, start_date: NaiveDate, fallback_weeks: u32) {
        let mut cursor = start_date;

        for mesocycle in &mut program.mesocycles {
            let meso_start = cursor;
            let mut meso_day_span: u64 = 0;

            for microcycle in &mut mesocycle.microcycles {
                let length = u64::from(microcycle.length_in_days());
                let micro_start = cursor;
                let micro_end = plus_days(micro_start, length - 1);

                microcycle.start_date = Some(micro_start);
                microcycle.end_date = Some(micro_end);

                for day in &mut microcycle.training_days {
                    day.date = Some(plus_days(micro_start, u64::from(day.day_number - 1)));
                }

                cursor = plus_days(micro_end, 1);
                meso_day_span += length;
            }

            if meso_day_span == 0 {
                meso_day_span = u64::from(fallback_weeks.max(1)) * 7;
                cursor = plus_days(meso_start, meso_day_span);
            }

            mesocycle.start_date = Some(meso_start);
            mesocycle.end_date = Some(plus_days(meso_start, meso_day_span - 1));
        }

        program.start_date = Some(start_date);
        // The cursor sits on the day after the last microcycle
        program.end_date = Some(cursor.pred_opt().unwrap_or(cursor));

        debug!(
            start = %start_date,
            end = ?program.end_date,
            "program scheduled"
        );
    }
}

fn plus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DayExercise, IntensityLevel, Mesocycle, Microcycle, PrimaryGoal, TrainingDay,
    };

    fn day(day_number: u32) -> TrainingDay {
        TrainingDay {
            day_number,
            name: format!("Day {day_number}"),
            focus: String::new(),
            rest_day: false,
            date: None,
            exercises: vec![DayExercise {
                reps_min: Some(8),
                reps_max: Some(12),
                ..DayExercise::default()
            }],
        }
    }

    fn week(week_number: u32, day_numbers: &[u32]) -> Microcycle {
        Microcycle {
            week_number,
            name: format!("Week {week_number}"),
            intensity_level: IntensityLevel::Medium,
            start_date: None,
            end_date: None,
            training_days: day_numbers.iter().map(|&d| day(d)).collect(),
        }
    }

    fn program(microcycles: Vec<Microcycle>) -> Macrocycle {
        Macrocycle {
            name: "Test".into(),
            description: String::new(),
            objective: PrimaryGoal::GeneralFitness,
            start_date: None,
            end_date: None,
            mesocycles: vec![Mesocycle {
                block_number: 1,
                name: "Block 1".into(),
                focus: String::new(),
                description: String::new(),
                start_date: None,
                end_date: None,
                microcycles,
            }],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_seven_day_weeks_tile_the_calendar() {
        let mut program = program(vec![week(1, &[1, 3, 7]), week(2, &[1, 3, 7])]);
        DateScheduler::schedule(&mut program, date(2025, 6, 2), 4);

        let weeks = &program.mesocycles[0].microcycles;
        assert_eq!(weeks[0].start_date, Some(date(2025, 6, 2)));
        assert_eq!(weeks[0].end_date, Some(date(2025, 6, 8)));
        assert_eq!(weeks[1].start_date, Some(date(2025, 6, 9)));

        // day date = microcycle start + (day_number - 1)
        assert_eq!(weeks[0].training_days[1].date, Some(date(2025, 6, 4)));
        assert_eq!(weeks[1].training_days[2].date, Some(date(2025, 6, 15)));

        assert_eq!(program.start_date, Some(date(2025, 6, 2)));
        assert_eq!(program.end_date, Some(date(2025, 6, 15)));
        assert_eq!(program.mesocycles[0].end_date, Some(date(2025, 6, 15)));
    }

    #[test]
    fn test_extended_microcycle_shifts_the_next_week() {
        // 10-day first microcycle, then a plain 7-day one
        let mut program = program(vec![week(1, &[1, 5, 10]), week(2, &[1, 7])]);
        DateScheduler::schedule(&mut program, date(2025, 1, 1), 4);

        let weeks = &program.mesocycles[0].microcycles;
        assert_eq!(weeks[0].end_date, Some(date(2025, 1, 10)));
        assert_eq!(weeks[1].start_date, Some(date(2025, 1, 11)));
        assert_eq!(weeks[1].end_date, Some(date(2025, 1, 17)));
        assert_eq!(program.end_date, Some(date(2025, 1, 17)));
    }

    #[test]
    fn test_empty_mesocycle_falls_back_to_configured_weeks() {
        let mut program = program(Vec::new());
        DateScheduler::schedule(&mut program, date(2025, 1, 1), 4);

        let meso = &program.mesocycles[0];
        assert_eq!(meso.start_date, Some(date(2025, 1, 1)));
        assert_eq!(meso.end_date, Some(date(2025, 1, 28)));
    }
}
