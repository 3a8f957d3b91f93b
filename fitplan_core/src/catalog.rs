//! Default exercise catalog, grouped by body-focus category.
//!
//! Entries within a category are ordered; the generator only draws from the
//! leading entries, so the most approachable movement of each group comes first.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

/// Cached default catalog - built once and never mutated
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn reps(sets: u32, reps: u32) -> Volume {
    Volume::Reps { sets, reps }
}

fn timed(sets: u32, seconds: u32) -> Volume {
    Volume::Timed { sets, seconds }
}

fn exercise(
    id: &str,
    name: &str,
    category: Category,
    volume: Volume,
    energy_cost: u32,
    difficulty: Difficulty,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        category,
        volume,
        energy_cost,
        difficulty,
    }
}

/// Builds the default catalog with the built-in exercises
///
/// **Note**: prefer `get_default_catalog()` in production code; this is
/// kept for tests and for building catalogs to extend.
pub fn build_default_catalog() -> Catalog {
    use crate::types::Category::*;
    use crate::types::Difficulty::*;

    Catalog::from_exercises(vec![
        // Chest
        exercise("push_up", "Push-up", Chest, reps(3, 12), 30, Beginner),
        exercise("incline_push_up", "Incline Push-up", Chest, reps(3, 15), 25, Beginner),
        exercise("diamond_push_up", "Diamond Push-up", Chest, reps(3, 10), 35, Advanced),
        // Back
        exercise("superman", "Superman Hold", Back, timed(3, 30), 20, Beginner),
        exercise("inverted_row", "Inverted Row", Back, reps(3, 10), 35, Intermediate),
        exercise("pull_up", "Pull-up", Back, reps(3, 6), 45, Advanced),
        // Legs
        exercise("squat", "Bodyweight Squat", Legs, reps(3, 15), 40, Beginner),
        exercise("lunge", "Alternating Lunge", Legs, reps(3, 12), 45, Intermediate),
        exercise("jump_squat", "Jump Squat", Legs, reps(3, 10), 60, Advanced),
        // Shoulders
        exercise("pike_push_up", "Pike Push-up", Shoulders, reps(3, 8), 30, Intermediate),
        exercise("arm_circles", "Arm Circles", Shoulders, timed(2, 45), 15, Beginner),
        // Arms
        exercise("bench_dip", "Bench Dip", Arms, reps(3, 12), 30, Beginner),
        exercise("plank_up_down", "Plank Up-Down", Arms, reps(3, 10), 35, Intermediate),
        // Core
        exercise("plank", "Plank", Core, timed(3, 45), 20, Beginner),
        exercise("bicycle_crunch", "Bicycle Crunch", Core, reps(3, 20), 25, Beginner),
        exercise("hollow_hold", "Hollow Body Hold", Core, timed(3, 30), 25, Advanced),
        // Cardio
        exercise("jumping_jacks", "Jumping Jacks", Cardio, timed(3, 60), 50, Beginner),
        exercise("mountain_climber", "Mountain Climbers", Cardio, timed(3, 45), 55, Intermediate),
        exercise("burpee", "Burpee", Cardio, reps(3, 10), 70, Advanced),
    ])
}

impl Catalog {
    /// Build a catalog from a flat list, preserving order within each category
    pub fn from_exercises(exercises: Vec<Exercise>) -> Self {
        let mut by_category: BTreeMap<Category, Vec<Exercise>> = BTreeMap::new();
        for exercise in exercises {
            by_category
                .entry(exercise.category)
                .or_default()
                .push(exercise);
        }
        Catalog {
            exercises: by_category,
        }
    }

    /// Ordered exercises of a category; empty if the category has none
    pub fn by_category(&self, category: Category) -> &[Exercise] {
        self.get(category).unwrap_or(&[])
    }

    /// Strict lookup: `None` when the catalog has no entry for the category
    pub fn get(&self, category: Category) -> Option<&[Exercise]> {
        self.exercises.get(&category).map(Vec::as_slice)
    }

    /// Categories present in the catalog, in canonical order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.exercises.keys().copied()
    }

    /// Total number of exercises
    pub fn len(&self) -> usize {
        self.exercises.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (category, entries) in &self.exercises {
            if entries.is_empty() {
                errors.push(format!("Category '{}' has no exercises", category));
            }

            for ex in entries {
                if ex.id.is_empty() {
                    errors.push(format!("Exercise in '{}' has empty ID", category));
                }
                if !seen.insert(ex.id.as_str()) {
                    errors.push(format!("Duplicate exercise ID '{}'", ex.id));
                }
                if ex.name.is_empty() {
                    errors.push(format!("Exercise '{}' has empty name", ex.id));
                }
                if ex.category != *category {
                    errors.push(format!(
                        "Exercise '{}' filed under '{}' but tagged '{}'",
                        ex.id, category, ex.category
                    ));
                }

                let empty_volume = match ex.volume {
                    Volume::Reps { sets, reps } => sets == 0 || reps == 0,
                    Volume::Timed { sets, seconds } => sets == 0 || seconds == 0,
                };
                if empty_volume {
                    errors.push(format!("Exercise '{}' has zero volume", ex.id));
                }
            }
        }

        errors
    }
}
