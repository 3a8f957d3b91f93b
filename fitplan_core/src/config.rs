//! Configuration file support for fitplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitplan/config.toml`.

use crate::{Error, FitnessLevel, FocusArea, Goal, PlanParameters, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub plan: PlanConfig,
}

/// Live session timing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rest_seconds: default_rest_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl SessionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Default generation parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub fitness_level: FitnessLevel,

    #[serde(default)]
    pub goal: Goal,

    #[serde(default = "default_days_per_week")]
    pub days_per_week: u32,

    #[serde(default = "default_session_duration_minutes")]
    pub session_duration_minutes: u32,

    #[serde(default = "default_focus_areas")]
    pub focus_areas: Vec<FocusArea>,

    /// Fixed seed for reproducible plans; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            fitness_level: FitnessLevel::default(),
            goal: Goal::default(),
            days_per_week: default_days_per_week(),
            session_duration_minutes: default_session_duration_minutes(),
            focus_areas: default_focus_areas(),
            seed: None,
        }
    }
}

impl PlanConfig {
    /// Generation parameters from these defaults, clamped into range
    pub fn parameters(&self) -> PlanParameters {
        PlanParameters {
            fitness_level: self.fitness_level,
            goal: self.goal,
            days_per_week: self.days_per_week,
            session_duration_minutes: self.session_duration_minutes,
            focus_areas: self.focus_areas.clone(),
        }
        .clamped()
    }
}

// Default value functions
fn default_rest_seconds() -> u32 {
    crate::session::DEFAULT_REST_SECONDS
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_days_per_week() -> u32 {
    3
}

fn default_session_duration_minutes() -> u32 {
    30
}

fn default_focus_areas() -> Vec<FocusArea> {
    vec![FocusArea::FullBody]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .ok_or_else(|| Error::Config("cannot locate a config directory".into()))?,
        };
        Ok(base.join("fitplan").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.session.rest_seconds, 60);
        assert_eq!(config.session.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.plan.days_per_week, 3);
        assert_eq!(config.plan.focus_areas, vec![FocusArea::FullBody]);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[session]
rest_seconds = 45

[plan]
days_per_week = 5
focus_areas = ["legs", "core"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.rest_seconds, 45);
        assert_eq!(config.session.tick_interval_ms, 1000); // default
        assert_eq!(config.plan.days_per_week, 5);
        assert_eq!(config.plan.session_duration_minutes, 30); // default
        assert_eq!(
            config.plan.focus_areas,
            vec![
                FocusArea::Category(Category::Legs),
                FocusArea::Category(Category::Core)
            ]
        );
    }

    #[test]
    fn test_unknown_focus_area_rejected() {
        let toml_str = r#"
[plan]
focus_areas = ["tail"]
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_parameters_are_clamped() {
        let config: Config = toml::from_str("[plan]\ndays_per_week = 9\nsession_duration_minutes = 3\n").unwrap();
        let params = config.plan.parameters();
        assert_eq!(params.days_per_week, 7);
        assert_eq!(params.session_duration_minutes, 15);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.plan.seed = Some(17);
        config.plan.goal = Goal::Endurance;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.plan.seed, Some(17));
        assert_eq!(loaded.plan.goal, Goal::Endurance);
        assert_eq!(loaded.session.rest_seconds, 60);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
