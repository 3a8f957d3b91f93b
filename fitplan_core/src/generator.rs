//! Plan generator: preferences + catalog -> weekly plan.
//!
//! Generation rules:
//! - Day slots are the first `days_per_week` weekdays, Monday first
//! - Focus areas resolve to categories (`FullBody` expands to all seven)
//! - Each category contributes one exercise, drawn uniformly from the
//!   first two catalog entries of that category
//! - The day is truncated to `min(minutes / 10, 8)` exercises
//!
//! Randomness comes from an injected `Rng`, so a seeded generator yields
//! reproducible plans.

use crate::{Catalog, DayWorkout, ExerciseInstance, PlanParameters, WeeklyPlan, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Only the leading entries of each category are candidates
pub const VARIETY_POOL_SIZE: usize = 2;

/// Hard ceiling on exercises in a single day
pub const MAX_EXERCISES_PER_DAY: usize = 8;

/// Exercise cap for a session of the given length
pub fn max_exercises_per_day(session_duration_minutes: u32) -> usize {
    ((session_duration_minutes / 10) as usize).min(MAX_EXERCISES_PER_DAY)
}

/// Generate a weekly plan using the supplied random source
///
/// Parameters are clamped first; the clamped copy is stored in the plan.
/// Never fails: categories missing from the catalog simply contribute nothing.
pub fn generate_plan<R>(catalog: &Catalog, params: &PlanParameters, rng: &mut R) -> WeeklyPlan
where
    R: Rng + ?Sized,
{
    let params = params.clamped();
    let categories = params.resolved_categories();
    let cap = max_exercises_per_day(params.session_duration_minutes);

    let days: Vec<DayWorkout> = Weekday::ALL
        .iter()
        .take(params.days_per_week as usize)
        .map(|&day| {
            let mut exercises: Vec<ExerciseInstance> = categories
                .iter()
                .filter_map(|&category| {
                    let entries = catalog.by_category(category);
                    let pool = &entries[..entries.len().min(VARIETY_POOL_SIZE)];
                    pool.choose(&mut *rng).cloned()
                })
                .map(ExerciseInstance::new)
                .collect();

            exercises.truncate(cap);

            let total_energy_budget = exercises.iter().map(|i| i.exercise.energy_cost).sum();

            DayWorkout {
                day,
                exercises,
                duration_budget_minutes: params.session_duration_minutes,
                total_energy_budget,
                completed: false,
            }
        })
        .collect();

    tracing::info!(
        "Generated plan: {} days, up to {} exercises/day from {} categories",
        days.len(),
        cap,
        categories.len()
    );

    WeeklyPlan {
        id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        days,
        parameters: params,
    }
}

/// Generate a weekly plan with fresh thread-local randomness
pub fn generate_plan_random(catalog: &Catalog, params: &PlanParameters) -> WeeklyPlan {
    generate_plan(catalog, params, &mut rand::thread_rng())
}

/// Generate a weekly plan from a fixed seed
pub fn generate_plan_seeded(catalog: &Catalog, params: &PlanParameters, seed: u64) -> WeeklyPlan {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_plan(catalog, params, &mut rng)
}
