// Scheduler Configuration
//
// User preferences read by the scheduling engine: training weekdays, the XP
// target formula and the automatic transition thresholds. Stored as TOML.

use crate::error::{Result, SkillTrackError};
use crate::scheduling::calendar::{TrainingCalendar, DEFAULT_TRAINING_DAYS};
use crate::scheduling::focus::XpTargetFormula;
use crate::scheduling::transition::TransitionRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Training weekdays, 0 = Sunday .. 6 = Saturday
    pub training_days: Vec<u8>,

    /// XP required per focus level
    pub xp_target_formula: XpTargetFormula,

    /// Level at which acquisition skills move to maintenance
    pub maintenance_level_threshold: u32,

    /// Idle days after which focus skills move to maintenance
    pub focus_idle_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let rules = TransitionRules::default();
        Self {
            training_days: DEFAULT_TRAINING_DAYS.to_vec(),
            xp_target_formula: XpTargetFormula::Gentle,
            maintenance_level_threshold: rules.maintenance_level_threshold,
            focus_idle_days: rules.focus_idle_days,
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config location: `<config dir>/skilltrack/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skilltrack").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Builds and discards a calendar: same empty/range checks
        TrainingCalendar::new(self.training_days.iter().copied())?;

        if self.maintenance_level_threshold == 0 {
            return Err(SkillTrackError::Config(
                "maintenance_level_threshold must be at least 1".to_string(),
            ));
        }

        if self.focus_idle_days < 1 {
            return Err(SkillTrackError::Config(
                "focus_idle_days must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Training calendar for these settings
    pub fn calendar(&self) -> Result<TrainingCalendar> {
        TrainingCalendar::new(self.training_days.iter().copied())
    }

    pub fn transition_rules(&self) -> TransitionRules {
        TransitionRules {
            maintenance_level_threshold: self.maintenance_level_threshold,
            focus_idle_days: self.focus_idle_days,
        }
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let toml_str = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
