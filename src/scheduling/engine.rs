// Scheduling Engine
//
// Entry point for orchestrators. Every call takes a stored SkillRecord,
// normalizes it once, and hands the populated SkillProgress to the pure
// components. The training calendar is borrowed from the caller; the engine
// never looks one up on its own.

use super::calendar::TrainingCalendar;
use super::focus::{self, XpTargetFormula};
use super::normalize::{normalize, Fallback, Normalized};
use super::retention::{update_retention, RetentionUpdate};
use super::transition::{check_auto_transition, TransitionPatch, TransitionRules};
use crate::config::SchedulerConfig;
use crate::error::{Result, SkillTrackError};
use crate::types::{FocusData, Phase, Quality, SkillProgress, SkillRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a full practice event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeOutcome {
    /// Skill after retention, focus and transition updates
    pub progress: SkillProgress,

    pub retention: RetentionUpdate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_data: Option<FocusData>,

    #[serde(skip_serializing_if = "TransitionPatch::is_empty")]
    pub transition: TransitionPatch,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<Fallback>,
}

/// Scheduling engine bound to one training calendar
#[derive(Debug, Clone)]
pub struct SchedulingEngine<'a> {
    calendar: &'a TrainingCalendar,
    xp_formula: XpTargetFormula,
    rules: TransitionRules,
}

impl<'a> SchedulingEngine<'a> {
    /// Engine with default XP formula and transition thresholds
    pub fn new(calendar: &'a TrainingCalendar) -> Self {
        Self {
            calendar,
            xp_formula: XpTargetFormula::default(),
            rules: TransitionRules::default(),
        }
    }

    /// Engine using the formula and thresholds from `config`
    pub fn from_config(config: &SchedulerConfig, calendar: &'a TrainingCalendar) -> Self {
        Self {
            calendar,
            xp_formula: config.xp_target_formula,
            rules: config.transition_rules(),
        }
    }

    pub fn calendar(&self) -> &TrainingCalendar {
        self.calendar
    }

    pub fn xp_formula(&self) -> XpTargetFormula {
        self.xp_formula
    }

    /// Fill missing fields with defaults and report what was substituted
    pub fn normalize(&self, record: &SkillRecord, now: DateTime<Utc>) -> Normalized {
        normalize(record, self.xp_formula, now)
    }

    /// New ease factor, interval, repetitions and next review for one event
    pub fn update_retention(
        &self,
        record: &SkillRecord,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> RetentionUpdate {
        let normalized = self.normalize(record, now);
        update_retention(&normalized.progress, quality, self.calendar, now)
    }

    /// Advance focus XP. `None` when the skill is not in the focus phase.
    pub fn progress_focus(
        &self,
        record: &SkillRecord,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Option<FocusData> {
        let progress = self.normalize(record, now).progress;
        if progress.phase != Phase::Focus {
            return None;
        }

        Some(focus::progress_focus(
            progress.focus_data.as_ref(),
            progress.level,
            quality,
            self.xp_formula,
        ))
    }

    /// Reset focus XP for a new level. `None` when the skill is not in focus
    /// or has no focus data yet.
    pub fn reset_focus_for_level_up(
        &self,
        record: &SkillRecord,
        new_level: u32,
        now: DateTime<Utc>,
    ) -> Option<FocusData> {
        let progress = self.normalize(record, now).progress;
        if progress.phase != Phase::Focus {
            return None;
        }

        progress
            .focus_data
            .as_ref()
            .map(|data| focus::reset_for_level_up(data, new_level, self.xp_formula))
    }

    /// Fields to change for an automatic phase transition, if any
    pub fn check_auto_transition(&self, record: &SkillRecord, now: DateTime<Utc>) -> TransitionPatch {
        let normalized = self.normalize(record, now);
        check_auto_transition(&normalized, &self.rules, self.calendar, now)
    }

    /// Commit a level increase, resetting focus XP when in focus
    pub fn level_up(
        &self,
        record: &SkillRecord,
        new_level: u32,
        now: DateTime<Utc>,
    ) -> Result<SkillProgress> {
        let progress = self.normalize(record, now).progress;
        if new_level < progress.level {
            return Err(SkillTrackError::LevelDecrease {
                from: progress.level,
                to: new_level,
            });
        }

        let focus_data = match progress.phase {
            Phase::Focus => progress
                .focus_data
                .as_ref()
                .map(|data| focus::reset_for_level_up(data, new_level, self.xp_formula)),
            _ => None,
        };

        tracing::info!(
            "Skill {} level {} -> {}",
            progress.id.as_deref().unwrap_or("<unnamed>"),
            progress.level,
            new_level
        );

        Ok(SkillProgress {
            level: new_level,
            focus_data,
            ..progress
        })
    }

    /// Run one practice event end to end
    ///
    /// Stamps `lastPracticed`, updates retention (next review included), then
    /// focus XP when in focus, then checks transitions against the merged
    /// record. The quality delta is applied once.
    pub fn record_practice(
        &self,
        record: &SkillRecord,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> PracticeOutcome {
        let stamped = SkillRecord {
            last_practiced: Some(now),
            ..record.clone()
        };
        let Normalized {
            progress,
            fallbacks,
        } = self.normalize(&stamped, now);

        let retention = update_retention(&progress, quality, self.calendar, now);
        let mut progress = progress.with_retention(&retention);

        let focus_data = match progress.phase {
            Phase::Focus => {
                let data = focus::progress_focus(
                    progress.focus_data.as_ref(),
                    progress.level,
                    quality,
                    self.xp_formula,
                );
                progress = progress.with_focus(data.clone());
                Some(data)
            }
            _ => None,
        };

        let merged = Normalized {
            progress,
            fallbacks,
        };
        let transition = check_auto_transition(&merged, &self.rules, self.calendar, now);
        let progress = transition.apply(&merged.progress);

        PracticeOutcome {
            progress,
            retention,
            focus_data,
            transition,
            fallbacks: merged.fallbacks,
        }
    }
}
