//! Core data types for the skilltrack scheduling engine
//!
//! Two shapes of a skill live here. [`SkillRecord`] is the boundary shape an
//! orchestrator loads from storage: every field is optional because legacy
//! records are missing some of them. [`SkillProgress`] is the fully populated
//! record the scheduling components operate on, produced by
//! [`crate::scheduling::normalize`].

use crate::error::SkillTrackError;
use crate::scheduling::retention::{RetentionUpdate, DEFAULT_EASE_FACTOR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learning stage of a skill. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Parked, not scheduled
    Backlog,

    /// Being learned; intervals grow by a cumulative quality bonus
    Acquisition,

    /// Learned; intervals follow SM2
    Maintenance,

    /// Intensive daily practice tracked with XP
    Focus,

    /// Retired, not scheduled
    Archived,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Backlog,
        Phase::Acquisition,
        Phase::Maintenance,
        Phase::Focus,
        Phase::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Backlog => "backlog",
            Phase::Acquisition => "acquisition",
            Phase::Maintenance => "maintenance",
            Phase::Focus => "focus",
            Phase::Archived => "archived",
        }
    }

    /// Parse a stored status string. Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(s))
    }

    /// Whether practice in this phase moves ease factor, interval and repetitions
    pub fn updates_retention(&self) -> bool {
        matches!(self, Phase::Acquisition | Phase::Maintenance)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit system for intervals: calendar days or training weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Daily,
    Weekly,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Daily => "daily",
            Mode::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Mode::Daily),
            "weekly" => Some(Mode::Weekly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-rated recall score for one practice event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    Forgotten = 1,
    Hard = 2,
    Good = 3,
    VeryEasy = 4,
}

impl Quality {
    pub const ALL: [Quality; 4] = [
        Quality::Forgotten,
        Quality::Hard,
        Quality::Good,
        Quality::VeryEasy,
    ];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Good or better counts as a successful recall
    pub fn is_success(&self) -> bool {
        *self >= Quality::Good
    }
}

impl TryFrom<u8> for Quality {
    type Error = SkillTrackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quality::Forgotten),
            2 => Ok(Quality::Hard),
            3 => Ok(Quality::Good),
            4 => Ok(Quality::VeryEasy),
            other => Err(SkillTrackError::InvalidQuality(other)),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> u8 {
        quality.value()
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Quality::Forgotten => "forgotten",
            Quality::Hard => "hard",
            Quality::Good => "good",
            Quality::VeryEasy => "very easy",
        };
        write!(f, "{} ({})", self.value(), label)
    }
}

/// XP progress while a skill is in the focus phase
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusData {
    pub total_sessions: u32,
    pub consecutive_good_sessions: u32,
    pub current_xp: u32,
    pub target_xp: u32,
    pub last_quality: Option<Quality>,

    /// Sticky: only a level-up reset clears it
    pub ready_for_level_up: bool,
}

impl FocusData {
    /// Fresh focus data for a skill entering the focus phase
    pub fn new(target_xp: u32) -> Self {
        Self {
            target_xp,
            ..Default::default()
        }
    }
}

/// Skill record as stored by the orchestrator
///
/// Accepts legacy and partial records. The status string is kept raw so an
/// unrecognized value can be reported instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_data: Option<FocusData>,
}

/// Fully populated retention state of one skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub phase: Phase,
    pub mode: Mode,
    pub level: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub last_practiced: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_data: Option<FocusData>,
}

impl SkillProgress {
    /// Create a new skill with default retention parameters
    pub fn new(phase: Phase, mode: Mode, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            phase,
            mode,
            level: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
            last_practiced: now,
            next_review: None,
            focus_data: None,
        }
    }

    /// Copy with the result of a retention update merged in
    pub fn with_retention(&self, update: &RetentionUpdate) -> Self {
        Self {
            ease_factor: update.ease_factor,
            interval: update.interval,
            repetitions: update.repetitions,
            next_review: Some(update.next_review),
            ..self.clone()
        }
    }

    /// Copy with new focus data
    pub fn with_focus(&self, focus_data: FocusData) -> Self {
        Self {
            focus_data: Some(focus_data),
            ..self.clone()
        }
    }

    /// A skill with no scheduled review yet is due immediately
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |next| next <= now)
    }
}

impl From<SkillProgress> for SkillRecord {
    fn from(progress: SkillProgress) -> Self {
        Self {
            id: progress.id,
            phase: Some(progress.phase.as_str().to_string()),
            mode: Some(progress.mode.as_str().to_string()),
            level: Some(progress.level),
            ease_factor: Some(progress.ease_factor),
            interval: Some(progress.interval),
            repetitions: Some(progress.repetitions),
            last_practiced: Some(progress.last_practiced),
            next_review: progress.next_review,
            focus_data: progress.focus_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_phase_parse() {
        assert_eq!(Phase::parse("maintenance"), Some(Phase::Maintenance));
        assert_eq!(Phase::parse(" Focus "), Some(Phase::Focus));
        assert_eq!(Phase::parse("learning"), None);
        assert_eq!(Phase::parse(""), None);
    }

    #[test]
    fn test_phase_updates_retention() {
        assert!(Phase::Acquisition.updates_retention());
        assert!(Phase::Maintenance.updates_retention());
        assert!(!Phase::Backlog.updates_retention());
        assert!(!Phase::Focus.updates_retention());
        assert!(!Phase::Archived.updates_retention());
    }

    #[test]
    fn test_quality_try_from() {
        assert_eq!(Quality::try_from(3).unwrap(), Quality::Good);
        assert!(matches!(
            Quality::try_from(0),
            Err(SkillTrackError::InvalidQuality(0))
        ));
        assert!(Quality::try_from(5).is_err());
    }

    #[test]
    fn test_quality_serde_as_integer() {
        let json = serde_json::to_string(&Quality::VeryEasy).unwrap();
        assert_eq!(json, "4");

        let parsed: Quality = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Quality::Hard);

        assert!(serde_json::from_str::<Quality>("7").is_err());
    }

    #[test]
    fn test_skill_record_accepts_legacy_json() {
        let json = r#"{
            "id": "guitar-scales",
            "status": "acquisition",
            "mode": "weekly",
            "level": 2,
            "lastPracticed": "2024-03-03T10:00:00Z"
        }"#;

        let record: SkillRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.phase.as_deref(), Some("acquisition"));
        assert_eq!(record.mode.as_deref(), Some("weekly"));
        assert_eq!(record.ease_factor, None);
        assert_eq!(record.interval, None);
        assert!(record.last_practiced.is_some());
    }

    #[test]
    fn test_new_skill_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        let skill = SkillProgress::new(Phase::Maintenance, Mode::Daily, now);

        assert_eq!(skill.ease_factor, 2.5);
        assert_eq!(skill.interval, 1);
        assert_eq!(skill.repetitions, 0);
        assert_eq!(skill.level, 0);
        assert!(skill.focus_data.is_none());
        assert!(skill.is_due(now));
    }

    #[test]
    fn test_is_due() {
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        let mut skill = SkillProgress::new(Phase::Maintenance, Mode::Daily, now);

        skill.next_review = Some(now + Duration::days(1));
        assert!(!skill.is_due(now));
        assert!(skill.is_due(now + Duration::days(1)));
    }

    #[test]
    fn test_progress_into_record() {
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        let skill = SkillProgress::new(Phase::Focus, Mode::Weekly, now);

        let record = SkillRecord::from(skill);
        assert_eq!(record.phase.as_deref(), Some("focus"));
        assert_eq!(record.mode.as_deref(), Some("weekly"));
        assert_eq!(record.interval, Some(1));
    }
}
