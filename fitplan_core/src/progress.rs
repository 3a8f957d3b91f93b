//! Weekly progress ledger.
//!
//! Completed day labels and energy only ever accumulate; nothing removes a
//! label or lowers the energy total. The ledger survives plan regeneration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Completed days of the current cycle plus cumulative energy expended
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressState {
    completed_day_labels: BTreeSet<String>,
    cumulative_energy: u32,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished day and the energy it burned
    pub fn record(&mut self, day_label: &str, energy: u32) {
        let newly_added = self.completed_day_labels.insert(day_label.to_string());
        self.cumulative_energy = self.cumulative_energy.saturating_add(energy);

        tracing::info!(
            "Progress: {} recorded{}, cumulative energy {} kcal",
            day_label,
            if newly_added { "" } else { " (already completed)" },
            self.cumulative_energy
        );
    }

    pub fn completed_day_labels(&self) -> &BTreeSet<String> {
        &self.completed_day_labels
    }

    pub fn is_completed(&self, day_label: &str) -> bool {
        self.completed_day_labels.contains(day_label)
    }

    pub fn cumulative_energy(&self) -> u32 {
        self.cumulative_energy
    }

    /// Fraction of the week completed, clamped to `[0.0, 1.0]`
    pub fn ratio(&self, days_per_week: u32) -> f64 {
        if days_per_week == 0 {
            return 0.0;
        }
        (self.completed_day_labels.len() as f64 / days_per_week as f64).clamp(0.0, 1.0)
    }

    /// Completion as a whole percentage, 0..=100
    pub fn percent(&self, days_per_week: u32) -> u8 {
        (self.ratio(days_per_week) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_progress() {
        let progress = ProgressState::new();
        assert_eq!(progress.ratio(3), 0.0);
        assert_eq!(progress.percent(3), 0);
        assert_eq!(progress.cumulative_energy(), 0);
    }

    #[test]
    fn test_ratio_accumulates() {
        let mut progress = ProgressState::new();
        progress.record("Monday", 120);
        assert_eq!(progress.percent(4), 25);

        progress.record("Tuesday", 80);
        assert_eq!(progress.ratio(4), 0.5);
        assert_eq!(progress.cumulative_energy(), 200);
    }

    #[test]
    fn test_ratio_never_exceeds_full() {
        let mut progress = ProgressState::new();
        for day in ["Monday", "Tuesday", "Wednesday"] {
            progress.record(day, 10);
        }
        assert_eq!(progress.percent(2), 100);
        assert_eq!(progress.ratio(2), 1.0);
    }

    #[test]
    fn test_repeat_label_counts_once() {
        let mut progress = ProgressState::new();
        progress.record("Monday", 50);
        progress.record("Monday", 50);

        assert_eq!(progress.completed_day_labels().len(), 1);
        assert!(progress.is_completed("Monday"));
        assert_eq!(progress.cumulative_energy(), 100);
    }

    #[test]
    fn test_zero_days_is_zero_ratio() {
        let mut progress = ProgressState::new();
        progress.record("Monday", 50);
        assert_eq!(progress.ratio(0), 0.0);
    }
}
