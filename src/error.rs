//! Error types for the skilltrack scheduling engine
//!
//! Only a handful of conditions are fatal. Missing or legacy fields on a skill
//! record are normalized with a logged fallback instead (see
//! [`crate::scheduling::normalize`]), so the variants here cover bad
//! configuration and bad input at the process edge.

use thiserror::Error;

/// Main error type for skilltrack operations
#[derive(Error, Debug)]
pub enum SkillTrackError {
    /// The training calendar was configured with no weekdays
    #[error("Training schedule must contain at least one weekday")]
    EmptyTrainingSchedule,

    /// A weekday index outside 0 (Sunday) ..= 6 (Saturday)
    #[error("Invalid weekday index: {0} (expected 0-6)")]
    InvalidWeekday(u8),

    /// A quality score outside 1 ..= 4
    #[error("Invalid quality: {0} (expected 1-4)")]
    InvalidQuality(u8),

    /// Level changes may only move forward
    #[error("Invalid level change: {from} -> {to}")]
    LevelDecrease { from: u32, to: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for skilltrack operations
pub type Result<T> = std::result::Result<T, SkillTrackError>;
