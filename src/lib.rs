//! Skilltrack - spaced-repetition scheduling for a personal skill tracker
//!
//! Decides, after every practice event, how a skill's retention parameters
//! evolve and when it should next be reviewed:
//! - SM2 interval / ease-factor updates during maintenance
//! - Cumulative-bonus intervals during acquisition
//! - XP progression during focus
//! - Weekly-mode dates snapped onto configured training days
//! - Automatic phase transitions that keep the review cadence continuous
//!
//! # Architecture
//!
//! - **Types**: stored records and the normalized progress shape
//! - **Scheduling**: the pure components plus the [`SchedulingEngine`] façade
//! - **Config**: training days and thresholds, loaded from TOML
//!
//! Persistence, UI and CRUD belong to the caller.
//!
//! # Example
//!
//! ```
//! use skilltrack_core::{Quality, SchedulerConfig, SchedulingEngine, SkillRecord};
//!
//! # fn main() -> skilltrack_core::Result<()> {
//! let config = SchedulerConfig::default();
//! let calendar = config.calendar()?;
//! let engine = SchedulingEngine::from_config(&config, &calendar);
//!
//! let record = SkillRecord {
//!     phase: Some("acquisition".to_string()),
//!     mode: Some("weekly".to_string()),
//!     ..Default::default()
//! };
//! let outcome = engine.record_practice(&record, Quality::Good, chrono::Utc::now());
//! assert_eq!(outcome.progress.interval, 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod scheduling;
pub mod types;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use error::{Result, SkillTrackError};
pub use scheduling::{
    Fallback, Normalized, PracticeOutcome, RetentionUpdate, SchedulingEngine, TrainingCalendar,
    TransitionPatch, TransitionRules, XpTargetFormula,
};
pub use types::{FocusData, Mode, Phase, Quality, SkillProgress, SkillRecord};
