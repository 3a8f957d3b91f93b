//! Live workout session state machine.
//!
//! `SessionController` exclusively owns the weekly plan, the active session
//! and the progress ledger. Everything outside mutates them only through the
//! operations below. Transitions attempted from the wrong state are ignored
//! (logged at debug) and reported as `false`.
//!
//! ```text
//! Idle --start--> Running --complete_exercise--> Resting
//!                    ^                               |
//!                    +------- rest expiry -----------+
//!                                                    | (last exercise)
//!                                                    v
//! Idle <--------------- finish ----------------- Completed
//! ```

use crate::{DayWorkout, ExerciseInstance, ProgressState, WeeklyPlan, Weekday};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default rest between exercises, in seconds
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Observable phase of the controller
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Running,
    Resting,
    Completed,
}

/// Which heartbeat a tick belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Total session clock, gated by `running_active`
    Elapsed,
    /// Rest countdown, gated by the Resting phase
    Rest,
}

/// Execution context of the day currently in progress
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    day_index: usize,
    day: Weekday,
    phase: SessionPhase,
    current_exercise_index: usize,
    exercise_count: usize,
    elapsed_seconds: u32,
    rest_remaining_seconds: u32,
    running_active: bool,
    energy_expended: u32,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn day_index(&self) -> usize {
        self.day_index
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    pub fn exercise_count(&self) -> usize {
        self.exercise_count
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn rest_remaining_seconds(&self) -> u32 {
        self.rest_remaining_seconds
    }

    pub fn rest_active(&self) -> bool {
        self.phase == SessionPhase::Resting
    }

    pub fn running_active(&self) -> bool {
        self.running_active
    }

    /// Energy from exercises completed in this session (kcal)
    pub fn energy_expended(&self) -> u32 {
        self.energy_expended
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Serializable view for the display layer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub plan_id: Uuid,
    pub phase: SessionPhase,
    pub session: Option<Session>,
    pub completed_day_labels: Vec<String>,
    pub cumulative_energy: u32,
    pub progress_percent: u8,
}

/// Owner of plan, session and progress
#[derive(Clone, Debug)]
pub struct SessionController {
    plan: WeeklyPlan,
    session: Option<Session>,
    progress: ProgressState,
    rest_seconds: u32,
}

impl SessionController {
    pub fn new(plan: WeeklyPlan) -> Self {
        Self {
            plan,
            session: None,
            progress: ProgressState::new(),
            rest_seconds: DEFAULT_REST_SECONDS,
        }
    }

    /// Override the rest interval inserted after each exercise
    pub fn with_rest_seconds(mut self, rest_seconds: u32) -> Self {
        self.rest_seconds = rest_seconds;
        self
    }

    pub fn plan(&self) -> &WeeklyPlan {
        &self.plan
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Idle, |s| s.phase)
    }

    /// Weekly completion against the current plan's `days_per_week`
    pub fn progress_ratio(&self) -> f64 {
        self.progress.ratio(self.plan.parameters.days_per_week)
    }

    pub fn active_day(&self) -> Option<&DayWorkout> {
        self.session
            .as_ref()
            .and_then(|s| self.plan.days.get(s.day_index))
    }

    /// The exercise the user should be doing (or resting after)
    pub fn current_exercise(&self) -> Option<&ExerciseInstance> {
        let session = self.session.as_ref()?;
        self.plan
            .days
            .get(session.day_index)?
            .exercises
            .get(session.current_exercise_index)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            plan_id: self.plan.id,
            phase: self.phase(),
            session: self.session.clone(),
            completed_day_labels: self
                .progress
                .completed_day_labels()
                .iter()
                .cloned()
                .collect(),
            cumulative_energy: self.progress.cumulative_energy(),
            progress_percent: self.progress.percent(self.plan.parameters.days_per_week),
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Start the day at `day_index`. Idle only; completed days are not restarted.
    pub fn start(&mut self, day_index: usize) -> bool {
        if self.session.is_some() {
            tracing::debug!("start ignored: a session is already active");
            return false;
        }

        let day = match self.plan.days.get_mut(day_index) {
            Some(day) if !day.completed => day,
            Some(day) => {
                tracing::debug!("start ignored: {} already completed", day.label());
                return false;
            }
            None => {
                tracing::debug!("start ignored: no day at index {}", day_index);
                return false;
            }
        };

        // A fresh attempt after an abandoned one starts from a clean slate
        for instance in &mut day.exercises {
            instance.completed = false;
        }

        let exercise_count = day.exercises.len();
        let phase = if exercise_count == 0 {
            SessionPhase::Completed
        } else {
            SessionPhase::Running
        };

        self.session = Some(Session {
            day_index,
            day: day.day,
            phase,
            current_exercise_index: 0,
            exercise_count,
            elapsed_seconds: 0,
            rest_remaining_seconds: 0,
            running_active: phase == SessionPhase::Running,
            energy_expended: 0,
            started_at: Utc::now(),
        });

        tracing::info!(
            "Session started: {} ({} exercises)",
            day.label(),
            exercise_count
        );
        true
    }

    /// Start the day with the given label (e.g. "Monday")
    pub fn start_by_label(&mut self, label: &str) -> bool {
        match self.plan.position_of(label) {
            Some(index) => self.start(index),
            None => {
                tracing::debug!("start ignored: no day labelled {:?}", label);
                false
            }
        }
    }

    /// Apply one heartbeat of the given kind
    pub fn tick(&mut self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Elapsed => self.tick_elapsed(),
            TimerKind::Rest => self.tick_rest(),
        }
    }

    /// One second of total session time; counts during rest too
    pub fn tick_elapsed(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) if session.running_active => {
                session.elapsed_seconds = session.elapsed_seconds.saturating_add(1);
                true
            }
            _ => false,
        }
    }

    /// One second of rest countdown; expiry advances to the next exercise
    pub fn tick_rest(&mut self) -> bool {
        let session = match self.session.as_mut() {
            Some(s) if s.phase == SessionPhase::Resting => s,
            _ => return false,
        };

        session.rest_remaining_seconds = session.rest_remaining_seconds.saturating_sub(1);
        tracing::debug!("Rest: {}s remaining", session.rest_remaining_seconds);

        if session.rest_remaining_seconds == 0 {
            Self::expire_rest(session);
        }
        true
    }

    fn expire_rest(session: &mut Session) {
        if session.current_exercise_index + 1 >= session.exercise_count {
            session.current_exercise_index = session.exercise_count;
            session.phase = SessionPhase::Completed;
            session.running_active = false;
            tracing::info!(
                "All {} exercises done after {}s, awaiting finish",
                session.exercise_count,
                session.elapsed_seconds
            );
        } else {
            session.current_exercise_index += 1;
            session.phase = SessionPhase::Running;
            tracing::info!(
                "Rest over, exercise {}/{}",
                session.current_exercise_index + 1,
                session.exercise_count
            );
        }
    }

    /// Mark exercise `index` done and begin the rest countdown
    ///
    /// Only the current exercise can be completed, only while not resting,
    /// and only once.
    pub fn complete_exercise(&mut self, index: usize) -> bool {
        let session = match self.session.as_mut() {
            Some(s) if s.phase == SessionPhase::Running && s.current_exercise_index == index => s,
            _ => {
                tracing::debug!("complete_exercise({}) ignored", index);
                return false;
            }
        };

        let instance = match self
            .plan
            .days
            .get_mut(session.day_index)
            .and_then(|d| d.exercises.get_mut(index))
        {
            Some(i) if !i.completed => i,
            _ => {
                tracing::debug!("complete_exercise({}) ignored: already completed", index);
                return false;
            }
        };

        instance.completed = true;
        session.energy_expended = session
            .energy_expended
            .saturating_add(instance.exercise.energy_cost);
        session.phase = SessionPhase::Resting;
        session.rest_remaining_seconds = self.rest_seconds;

        tracing::info!(
            "Completed {} (+{} kcal), resting {}s",
            instance.exercise.name,
            instance.exercise.energy_cost,
            self.rest_seconds
        );

        if self.rest_seconds == 0 {
            Self::expire_rest(session);
        }
        true
    }

    /// Confirm a completed workout: mark the day done and record progress
    pub fn finish(&mut self) -> bool {
        let session = match self.session.take() {
            Some(s) if s.phase == SessionPhase::Completed => s,
            other => {
                self.session = other;
                tracing::debug!("finish ignored in {:?}", self.phase());
                return false;
            }
        };

        let Some(day) = self.plan.days.get_mut(session.day_index) else {
            self.session = Some(session);
            return false;
        };
        day.completed = true;
        self.progress.record(day.label(), session.energy_expended);

        tracing::info!(
            "Finished {}: {} kcal in {}s",
            day.label(),
            session.energy_expended,
            session.elapsed_seconds
        );
        true
    }

    /// Stop the elapsed clock; the rest countdown is unaffected
    pub fn pause(&mut self) -> bool {
        match self.session.as_mut() {
            Some(s) if s.running_active => {
                s.running_active = false;
                tracing::info!("Session paused at {}s", s.elapsed_seconds);
                true
            }
            _ => false,
        }
    }

    /// Restart the elapsed clock
    pub fn resume(&mut self) -> bool {
        match self.session.as_mut() {
            Some(s) if !s.running_active && s.phase != SessionPhase::Completed => {
                s.running_active = true;
                tracing::info!("Session resumed at {}s", s.elapsed_seconds);
                true
            }
            _ => false,
        }
    }

    /// Zero the elapsed clock without changing phase
    pub fn reset(&mut self) -> bool {
        match self.session.as_mut() {
            Some(s) => {
                s.elapsed_seconds = 0;
                true
            }
            None => false,
        }
    }

    /// Drop the active session without recording anything
    pub fn abandon(&mut self) -> bool {
        match self.session.take() {
            Some(s) => {
                tracing::info!("Session on {} abandoned", s.day);
                true
            }
            None => false,
        }
    }

    /// Replace the plan. Any session in progress is discarded; progress is kept.
    pub fn regenerate(&mut self, plan: WeeklyPlan) {
        if let Some(s) = self.session.take() {
            tracing::info!("Plan regenerated, discarding session on {}", s.day);
        }
        self.plan = plan;
    }
}
