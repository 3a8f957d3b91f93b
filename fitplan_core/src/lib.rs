#![forbid(unsafe_code)]

//! Core domain model and business logic for the fitplan workout planner.
//!
//! This crate provides:
//! - Domain types (categories, exercises, day workouts, weekly plans)
//! - The exercise catalog
//! - Weekly plan generation
//! - The live session state machine and its heartbeat runtime
//! - Weekly progress tracking

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod generator;
pub mod session;
pub mod progress;
pub mod runtime;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use generator::{generate_plan, generate_plan_random, generate_plan_seeded, max_exercises_per_day};
pub use session::{Session, SessionController, SessionPhase, SessionSnapshot, TimerKind};
pub use progress::ProgressState;
pub use runtime::{Heartbeats, SessionHandle, SessionRuntime};
