// Input Normalization
//
// Converts a stored SkillRecord into a fully populated SkillProgress. Legacy
// and partial records are filled with documented defaults; every substitution
// is logged and returned as a Fallback so callers can observe it. Nothing
// here fails: the only fatal configuration error (an empty training schedule)
// is rejected when the calendar is built.
//
// Defaults:
// - phase missing or unrecognized -> acquisition
// - mode missing or unrecognized  -> daily
// - level                          -> 0
// - ease factor                    -> 2.5 (out-of-range values are clamped)
// - interval                       -> 0 for acquisition, 1 otherwise
//                                     (values past the mode's ceiling are clamped)
// - repetitions                    -> 0
// - last practiced                 -> now
// - focus data outside focus phase -> discarded
// - focus data with zero target XP -> target recomputed for the level

use super::focus::XpTargetFormula;
use super::retention::{max_interval, DEFAULT_EASE_FACTOR, MAX_EASE_FACTOR, MIN_EASE_FACTOR};
use crate::types::{Mode, Phase, SkillProgress, SkillRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A default substituted for a missing or unusable field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Fallback {
    Phase { raw: Option<String> },
    Mode { raw: Option<String> },
    Level,
    EaseFactor { substituted: f64 },
    EaseFactorOutOfRange { raw: f64, clamped: f64 },
    Interval { substituted: u32 },
    IntervalOutOfRange { raw: u32, clamped: u32 },
    Repetitions,
    LastPracticed,
    StrayFocusData,
    FocusTargetXp { substituted: u32 },
}

impl std::fmt::Display for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fallback::Phase { raw: Some(raw) } => {
                write!(f, "unrecognized phase '{}', treating as acquisition", raw)
            }
            Fallback::Phase { raw: None } => write!(f, "missing phase, treating as acquisition"),
            Fallback::Mode { raw: Some(raw) } => {
                write!(f, "unrecognized mode '{}', using daily", raw)
            }
            Fallback::Mode { raw: None } => write!(f, "missing mode, using daily"),
            Fallback::Level => write!(f, "missing level, using 0"),
            Fallback::EaseFactor { substituted } => {
                write!(f, "missing ease factor, using {}", substituted)
            }
            Fallback::EaseFactorOutOfRange { raw, clamped } => {
                write!(f, "ease factor {} out of range, clamped to {}", raw, clamped)
            }
            Fallback::Interval { substituted } => {
                write!(f, "missing interval, using {}", substituted)
            }
            Fallback::IntervalOutOfRange { raw, clamped } => {
                write!(f, "interval {} out of range, clamped to {}", raw, clamped)
            }
            Fallback::Repetitions => write!(f, "missing repetitions, using 0"),
            Fallback::LastPracticed => write!(f, "missing last-practiced date, using now"),
            Fallback::StrayFocusData => write!(f, "focus data outside focus phase discarded"),
            Fallback::FocusTargetXp { substituted } => {
                write!(f, "focus target XP was 0, using {}", substituted)
            }
        }
    }
}

/// Normalized skill plus the fallbacks that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub progress: SkillProgress,
    pub fallbacks: Vec<Fallback>,
}

impl Normalized {
    /// Whether the stored record carried no ease factor at all
    pub fn ease_factor_defaulted(&self) -> bool {
        self.fallbacks
            .iter()
            .any(|fallback| matches!(fallback, Fallback::EaseFactor { .. }))
    }
}

/// Normalize a stored record, logging each substitution
pub fn normalize(record: &SkillRecord, formula: XpTargetFormula, now: DateTime<Utc>) -> Normalized {
    let mut fallbacks = Vec::new();

    let phase = match record.phase.as_deref().map(|raw| (raw, Phase::parse(raw))) {
        Some((_, Some(phase))) => phase,
        Some((raw, None)) => {
            fallbacks.push(Fallback::Phase {
                raw: Some(raw.to_string()),
            });
            Phase::Acquisition
        }
        None => {
            fallbacks.push(Fallback::Phase { raw: None });
            Phase::Acquisition
        }
    };

    let mode = match record.mode.as_deref().map(|raw| (raw, Mode::parse(raw))) {
        Some((_, Some(mode))) => mode,
        Some((raw, None)) => {
            fallbacks.push(Fallback::Mode {
                raw: Some(raw.to_string()),
            });
            Mode::Daily
        }
        None => {
            fallbacks.push(Fallback::Mode { raw: None });
            Mode::Daily
        }
    };

    let level = record.level.unwrap_or_else(|| {
        fallbacks.push(Fallback::Level);
        0
    });

    let ease_factor = match record.ease_factor {
        Some(raw) if raw.is_finite() => {
            let clamped = raw.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);
            if clamped != raw {
                fallbacks.push(Fallback::EaseFactorOutOfRange { raw, clamped });
            }
            clamped
        }
        _ => {
            fallbacks.push(Fallback::EaseFactor {
                substituted: DEFAULT_EASE_FACTOR,
            });
            DEFAULT_EASE_FACTOR
        }
    };

    let interval = match record.interval {
        Some(raw) if raw > max_interval(mode) => {
            let clamped = max_interval(mode);
            fallbacks.push(Fallback::IntervalOutOfRange { raw, clamped });
            clamped
        }
        Some(raw) => raw,
        None => {
            let substituted = if phase == Phase::Acquisition { 0 } else { 1 };
            fallbacks.push(Fallback::Interval { substituted });
            substituted
        }
    };

    let repetitions = record.repetitions.unwrap_or_else(|| {
        fallbacks.push(Fallback::Repetitions);
        0
    });

    let last_practiced = record.last_practiced.unwrap_or_else(|| {
        fallbacks.push(Fallback::LastPracticed);
        now
    });

    let focus_data = match (&record.focus_data, phase) {
        (Some(data), Phase::Focus) if data.target_xp == 0 => {
            let substituted = formula.target_xp(level);
            fallbacks.push(Fallback::FocusTargetXp { substituted });
            let mut data = data.clone();
            data.target_xp = substituted;
            Some(data)
        }
        (Some(data), Phase::Focus) => Some(data.clone()),
        (Some(_), _) => {
            fallbacks.push(Fallback::StrayFocusData);
            None
        }
        (None, _) => None,
    };

    let id = record.id.as_deref().unwrap_or("<unnamed>");
    for fallback in &fallbacks {
        tracing::warn!("Skill {}: {}", id, fallback);
    }

    Normalized {
        progress: SkillProgress {
            id: record.id.clone(),
            phase,
            mode,
            level,
            ease_factor,
            interval,
            repetitions,
            last_practiced,
            next_review: record.next_review,
            focus_data,
        },
        fallbacks,
    }
}
