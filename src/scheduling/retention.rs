// Interval / Ease Update Engine
//
// Decides, once per practice event, how ease factor, interval and repetition
// count move. This is the only place a quality score changes the interval;
// the next-review resolver consumes the result as-is.
//
// - Maintenance: SM2 (ease factor driven)
// - Acquisition: cumulative bonus, ease factor untouched
// - Backlog / Focus / Archived: numbers pass through unchanged

use super::calendar::TrainingCalendar;
use super::next_review::resolve_next_review;
use crate::types::{Mode, Phase, Quality, SkillProgress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_EASE_FACTOR: f64 = 3.0;

/// Longest interval in daily mode: about a century
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Longest interval in weekly mode, the same span in weeks
pub const MAX_INTERVAL_WEEKS: u32 = MAX_INTERVAL_DAYS / 7;

/// Interval ceiling for a mode's unit
pub fn max_interval(mode: Mode) -> u32 {
    match mode {
        Mode::Daily => MAX_INTERVAL_DAYS,
        Mode::Weekly => MAX_INTERVAL_WEEKS,
    }
}

/// Ease factor, interval and repetitions after one practice event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

/// Complete result of a retention update, next review included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionUpdate {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
}

/// Update retention numbers and resolve the next review from them
///
/// The resolver is handed the already-updated record, so the quality delta is
/// applied exactly once.
pub fn update_retention(
    progress: &SkillProgress,
    quality: Quality,
    calendar: &TrainingCalendar,
    now: DateTime<Utc>,
) -> RetentionUpdate {
    let state = next_retention_state(progress, quality);

    let updated = SkillProgress {
        ease_factor: state.ease_factor,
        interval: state.interval,
        repetitions: state.repetitions,
        ..progress.clone()
    };
    let next_review = resolve_next_review(&updated, quality, calendar, now);

    tracing::debug!(
        "Retention update for {} ({}, {}, quality {}): ease {:.2} -> {:.2}, interval {} -> {}, repetitions {} -> {}",
        progress.id.as_deref().unwrap_or("<unnamed>"),
        progress.phase,
        progress.mode,
        quality,
        progress.ease_factor,
        state.ease_factor,
        progress.interval,
        state.interval,
        progress.repetitions,
        state.repetitions
    );

    RetentionUpdate {
        ease_factor: state.ease_factor,
        interval: state.interval,
        repetitions: state.repetitions,
        next_review,
    }
}

/// Compute the new numbers without resolving a date
pub fn next_retention_state(progress: &SkillProgress, quality: Quality) -> RetentionState {
    let current = RetentionState {
        ease_factor: progress.ease_factor,
        interval: progress.interval,
        repetitions: progress.repetitions,
    };

    match progress.phase {
        Phase::Maintenance => sm2_step(current, quality, max_interval(progress.mode)),
        Phase::Acquisition => acquisition_step(current, quality, max_interval(progress.mode)),
        Phase::Backlog | Phase::Focus | Phase::Archived => current,
    }
}

/// SM2 step used during maintenance
fn sm2_step(current: RetentionState, quality: Quality, ceiling: u32) -> RetentionState {
    let ease_delta = match quality {
        Quality::VeryEasy => 0.1,
        Quality::Good => -0.02,
        Quality::Hard | Quality::Forgotten => -0.15,
    };
    let ease_factor = clamp_ease(current.ease_factor + ease_delta);

    if !quality.is_success() {
        return RetentionState {
            ease_factor,
            interval: 1,
            repetitions: 0,
        };
    }

    let repetitions = current.repetitions.saturating_add(1);
    let interval = match repetitions {
        1 => 1,
        2 => 6,
        // f64 -> u32 casts saturate, the ceiling does the rest
        _ => ((current.interval as f64 * ease_factor).round() as u32).clamp(1, ceiling),
    };

    RetentionState {
        ease_factor,
        interval,
        repetitions,
    }
}

/// Cumulative-bonus step used during acquisition
fn acquisition_step(current: RetentionState, quality: Quality, ceiling: u32) -> RetentionState {
    let interval = match acquisition_bonus(quality) {
        None => 1,
        Some(bonus) => current.interval.saturating_add(bonus).clamp(1, ceiling),
    };

    RetentionState {
        ease_factor: current.ease_factor,
        interval,
        repetitions: current.repetitions.saturating_add(1),
    }
}

/// Interval bonus for acquisition; `None` resets the interval
pub fn acquisition_bonus(quality: Quality) -> Option<u32> {
    match quality {
        Quality::Forgotten => None,
        Quality::Hard => Some(0),
        Quality::Good => Some(1),
        Quality::VeryEasy => Some(2),
    }
}

/// Clamp into [1.3, 3.0] and drop float noise past two decimals
pub fn clamp_ease(value: f64) -> f64 {
    ((value * 100.0).round() / 100.0).clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
}
