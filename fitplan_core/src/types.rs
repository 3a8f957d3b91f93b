//! Core domain types for the workout planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise categories, focus areas and catalog entries
//! - Generation parameters
//! - Day workouts and weekly plans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Categories and Focus Areas
// ============================================================================

/// Body-focus category of an exercise
///
/// Declaration order is the canonical order used by the generator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
}

impl Category {
    /// The canonical full-body category set, in canonical order
    pub const ALL: [Category; 7] = [
        Category::Chest,
        Category::Back,
        Category::Legs,
        Category::Shoulders,
        Category::Arms,
        Category::Core,
        Category::Cardio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chest => "chest",
            Category::Back => "back",
            Category::Legs => "legs",
            Category::Shoulders => "shoulders",
            Category::Arms => "arms",
            Category::Core => "core",
            Category::Cardio => "cardio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// A requested focus area: either one category or the full-body sentinel
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum FocusArea {
    FullBody,
    Category(Category),
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusArea::FullBody => f.write_str("full_body"),
            FocusArea::Category(c) => c.fmt(f),
        }
    }
}

impl FromStr for FocusArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full_body" | "fullBody" | "full-body" => Ok(FocusArea::FullBody),
            other => other.parse().map(FocusArea::Category),
        }
    }
}

impl TryFrom<String> for FocusArea {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FocusArea> for String {
    fn from(value: FocusArea) -> Self {
        value.to_string()
    }
}

/// Resolve focus areas into the set of categories to draw from.
///
/// `FullBody` anywhere in the list expands to every category and overrides
/// the other tags. The result iterates in canonical order.
pub fn resolve_focus(areas: &[FocusArea]) -> BTreeSet<Category> {
    if areas.contains(&FocusArea::FullBody) {
        return Category::ALL.into_iter().collect();
    }

    areas
        .iter()
        .filter_map(|a| match a {
            FocusArea::Category(c) => Some(*c),
            FocusArea::FullBody => None,
        })
        .collect()
}

// ============================================================================
// Informational Preferences
// ============================================================================

/// Self-reported fitness level (recorded in the plan, does not drive selection)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Training goal (recorded in the plan, does not drive selection)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    BuildMuscle,
    Endurance,
    #[default]
    GeneralFitness,
}

macro_rules! snake_case_from_str {
    ($ty:ty, $($name:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($ty), other)),
                }
            }
        }
    };
}

snake_case_from_str!(FitnessLevel,
    "beginner" => FitnessLevel::Beginner,
    "intermediate" => FitnessLevel::Intermediate,
    "advanced" => FitnessLevel::Advanced,
);

snake_case_from_str!(Goal,
    "lose_weight" => Goal::LoseWeight,
    "build_muscle" => Goal::BuildMuscle,
    "endurance" => Goal::Endurance,
    "general_fitness" => Goal::GeneralFitness,
);

// ============================================================================
// Exercises
// ============================================================================

/// Difficulty tier of a catalog exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Prescribed volume: sets of reps or sets of timed holds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Volume {
    Reps { sets: u32, reps: u32 },
    Timed { sets: u32, seconds: u32 },
}

impl Volume {
    pub fn sets(&self) -> u32 {
        match self {
            Volume::Reps { sets, .. } | Volume::Timed { sets, .. } => *sets,
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::Reps { sets, reps } => write!(f, "{} x {} reps", sets, reps),
            Volume::Timed { sets, seconds } => write!(f, "{} x {}s", sets, seconds),
        }
    }
}

/// A catalog exercise definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub volume: Volume,
    /// Estimated kcal burned for the prescribed volume
    pub energy_cost: u32,
    pub difficulty: Difficulty,
}

/// The immutable reference catalog, keyed by category
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub(crate) exercises: BTreeMap<Category, Vec<Exercise>>,
}

// ============================================================================
// Plan Types
// ============================================================================

/// Calendar slot, Monday first
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs to the plan generator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanParameters {
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub goal: Goal,
    pub days_per_week: u32,
    pub session_duration_minutes: u32,
    pub focus_areas: Vec<FocusArea>,
}

impl PlanParameters {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 7;
    pub const MIN_MINUTES: u32 = 15;
    pub const MAX_MINUTES: u32 = 120;

    /// Copy of these parameters with numeric fields clamped into range
    pub fn clamped(&self) -> Self {
        let days = self.days_per_week.clamp(Self::MIN_DAYS, Self::MAX_DAYS);
        let minutes = self
            .session_duration_minutes
            .clamp(Self::MIN_MINUTES, Self::MAX_MINUTES);

        if days != self.days_per_week || minutes != self.session_duration_minutes {
            tracing::debug!(
                "Clamped parameters: days {} -> {}, minutes {} -> {}",
                self.days_per_week,
                days,
                self.session_duration_minutes,
                minutes
            );
        }

        Self {
            days_per_week: days,
            session_duration_minutes: minutes,
            ..self.clone()
        }
    }

    /// Categories the generator will draw from, in canonical order
    pub fn resolved_categories(&self) -> BTreeSet<Category> {
        resolve_focus(&self.focus_areas)
    }
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            fitness_level: FitnessLevel::default(),
            goal: Goal::default(),
            days_per_week: 3,
            session_duration_minutes: 30,
            focus_areas: vec![FocusArea::FullBody],
        }
    }
}

/// A catalog exercise placed into a day, with its own completion flag
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseInstance {
    pub exercise: Exercise,
    pub completed: bool,
}

impl ExerciseInstance {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            completed: false,
        }
    }
}

/// One day's prescribed exercise sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayWorkout {
    pub day: Weekday,
    pub exercises: Vec<ExerciseInstance>,
    pub duration_budget_minutes: u32,
    pub total_energy_budget: u32,
    pub completed: bool,
}

impl DayWorkout {
    pub fn label(&self) -> &'static str {
        self.day.label()
    }
}

/// A generated week of day workouts with the parameters that produced it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub days: Vec<DayWorkout>,
    pub parameters: PlanParameters,
}

impl WeeklyPlan {
    pub fn day(&self, index: usize) -> Option<&DayWorkout> {
        self.days.get(index)
    }

    /// Find a day by its label, case-insensitive
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.days
            .iter()
            .position(|d| d.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn day_by_label(&self, label: &str) -> Option<&DayWorkout> {
        self.position_of(label).and_then(|i| self.days.get(i))
    }

    pub fn total_energy_budget(&self) -> u32 {
        self.days.iter().map(|d| d.total_energy_budget).sum()
    }

    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_body_overrides_other_tags() {
        let resolved = resolve_focus(&[
            FocusArea::Category(Category::Legs),
            FocusArea::FullBody,
        ]);
        assert_eq!(resolved.len(), 7);
        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), Category::ALL);
    }

    #[test]
    fn test_resolve_focus_dedups_in_canonical_order() {
        let resolved = resolve_focus(&[
            FocusArea::Category(Category::Core),
            FocusArea::Category(Category::Chest),
            FocusArea::Category(Category::Core),
        ]);
        assert_eq!(
            resolved.into_iter().collect::<Vec<_>>(),
            vec![Category::Chest, Category::Core]
        );
    }

    #[test]
    fn test_focus_area_parsing() {
        assert_eq!("fullBody".parse::<FocusArea>(), Ok(FocusArea::FullBody));
        assert_eq!("full_body".parse::<FocusArea>(), Ok(FocusArea::FullBody));
        assert_eq!(
            "Legs".parse::<FocusArea>(),
            Ok(FocusArea::Category(Category::Legs))
        );
        assert!("wings".parse::<FocusArea>().is_err());
    }

    #[test]
    fn test_focus_area_serde() {
        let json = serde_json::to_string(&vec![
            FocusArea::FullBody,
            FocusArea::Category(Category::Cardio),
        ])
        .unwrap();
        assert_eq!(json, r#"["full_body","cardio"]"#);

        let parsed: Vec<FocusArea> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1], FocusArea::Category(Category::Cardio));
    }

    #[test]
    fn test_parameters_clamped() {
        let params = PlanParameters {
            days_per_week: 12,
            session_duration_minutes: 5,
            ..PlanParameters::default()
        };
        let clamped = params.clamped();
        assert_eq!(clamped.days_per_week, 7);
        assert_eq!(clamped.session_duration_minutes, 15);

        let zero = PlanParameters {
            days_per_week: 0,
            session_duration_minutes: 500,
            ..PlanParameters::default()
        };
        let clamped = zero.clamped();
        assert_eq!(clamped.days_per_week, 1);
        assert_eq!(clamped.session_duration_minutes, 120);
    }

    #[test]
    fn test_informational_enums_parse() {
        assert_eq!("Advanced".parse::<FitnessLevel>(), Ok(FitnessLevel::Advanced));
        assert_eq!("build_muscle".parse::<Goal>(), Ok(Goal::BuildMuscle));
        assert!("sleepy".parse::<Goal>().is_err());
    }
}
