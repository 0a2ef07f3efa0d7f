// Status Transition Resolver
//
// Decides whether a skill should change phase automatically and seeds the new
// phase so the review cadence stays continuous. Returns a patch; applying it
// is the caller's decision.
//
// Rules:
// - acquisition -> maintenance once level reaches the threshold (5)
// - focus -> maintenance once the skill has been idle for 7 days

use super::calendar::TrainingCalendar;
use super::next_review::resolve_next_review;
use super::normalize::Normalized;
use super::retention::{MAX_EASE_FACTOR, MIN_EASE_FACTOR};
use crate::types::{Phase, Quality, SkillProgress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SM2 fixes the interval at 6 after the second success
const SM2_SECOND_INTERVAL: f64 = 6.0;

/// Thresholds for automatic transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRules {
    /// Acquisition skills at or above this level move to maintenance
    pub maintenance_level_threshold: u32,

    /// Focus skills idle for at least this many days move to maintenance
    pub focus_idle_days: i64,
}

impl Default for TransitionRules {
    fn default() -> Self {
        Self {
            maintenance_level_threshold: 5,
            focus_idle_days: 7,
        }
    }
}

/// Fields to change on a skill. Empty when no transition applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,

    /// Focus data is dropped, not zeroed, when leaving focus
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discard_focus_data: bool,
}

impl TransitionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransitionPatch::default()
    }

    /// Return a copy of `progress` with the patch applied
    pub fn apply(&self, progress: &SkillProgress) -> SkillProgress {
        SkillProgress {
            id: progress.id.clone(),
            phase: self.phase.unwrap_or(progress.phase),
            mode: progress.mode,
            level: progress.level,
            ease_factor: self.ease_factor.unwrap_or(progress.ease_factor),
            interval: self.interval.unwrap_or(progress.interval),
            repetitions: self.repetitions.unwrap_or(progress.repetitions),
            last_practiced: progress.last_practiced,
            next_review: self.next_review.or(progress.next_review),
            focus_data: if self.discard_focus_data {
                None
            } else {
                progress.focus_data.clone()
            },
        }
    }
}

/// Check the automatic transition rules for a normalized skill
pub fn check_auto_transition(
    skill: &Normalized,
    rules: &TransitionRules,
    calendar: &TrainingCalendar,
    now: DateTime<Utc>,
) -> TransitionPatch {
    let progress = &skill.progress;

    let patch = match progress.phase {
        Phase::Acquisition if progress.level >= rules.maintenance_level_threshold => {
            graduate_to_maintenance(skill)
        }
        Phase::Focus
            if (now - progress.last_practiced).num_days() >= rules.focus_idle_days =>
        {
            resume_maintenance(progress, calendar, now)
        }
        _ => TransitionPatch::default(),
    };

    if let Some(phase) = patch.phase {
        tracing::info!(
            "Skill {} transitions {} -> {}",
            progress.id.as_deref().unwrap_or("<unnamed>"),
            progress.phase,
            phase
        );
    }

    patch
}

/// Smallest ease factor that keeps `round(interval * ease)` at or above the
/// current interval, i.e. `interval / 6` clamped into [1.3, 3.0]
pub fn continuity_ease_factor(interval: u32) -> f64 {
    let raw = interval as f64 / SM2_SECOND_INTERVAL;
    ((raw * 100.0).ceil() / 100.0).clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
}

fn graduate_to_maintenance(skill: &Normalized) -> TransitionPatch {
    let progress = &skill.progress;
    let minimum = continuity_ease_factor(progress.interval);

    // A record that never carried an ease factor is seeded with the minimum;
    // an existing one is only ever raised.
    let ease_factor = if skill.ease_factor_defaulted() {
        minimum
    } else {
        progress.ease_factor.max(minimum)
    };

    TransitionPatch {
        phase: Some(Phase::Maintenance),
        ease_factor: Some(ease_factor),
        interval: Some(progress.interval),
        repetitions: Some(2),
        ..Default::default()
    }
}

fn resume_maintenance(
    progress: &SkillProgress,
    calendar: &TrainingCalendar,
    now: DateTime<Utc>,
) -> TransitionPatch {
    let next_review = progress.next_review.unwrap_or_else(|| {
        let paused = SkillProgress {
            phase: Phase::Maintenance,
            ..progress.clone()
        };
        resolve_next_review(&paused, Quality::Good, calendar, now)
    });

    TransitionPatch {
        phase: Some(Phase::Maintenance),
        next_review: Some(next_review),
        discard_focus_data: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::focus::XpTargetFormula;
    use crate::scheduling::normalize::normalize;
    use crate::types::{FocusData, SkillRecord};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn acquisition(level: u32, interval: u32, ease: Option<f64>) -> Normalized {
        let record = SkillRecord {
            id: Some("piano".to_string()),
            phase: Some("acquisition".to_string()),
            mode: Some("daily".to_string()),
            level: Some(level),
            ease_factor: ease,
            interval: Some(interval),
            repetitions: Some(9),
            last_practiced: Some(now()),
            ..Default::default()
        };
        normalize(&record, XpTargetFormula::Gentle, now())
    }

    fn focus(days_idle: i64, next_review: Option<DateTime<Utc>>) -> Normalized {
        let record = SkillRecord {
            id: Some("drawing".to_string()),
            phase: Some("focus".to_string()),
            mode: Some("daily".to_string()),
            level: Some(2),
            ease_factor: Some(2.3),
            interval: Some(4),
            repetitions: Some(3),
            last_practiced: Some(now() - Duration::days(days_idle)),
            next_review,
            focus_data: Some(FocusData::new(6)),
        };
        normalize(&record, XpTargetFormula::Gentle, now())
    }

    fn check(skill: &Normalized) -> TransitionPatch {
        check_auto_transition(
            skill,
            &TransitionRules::default(),
            &TrainingCalendar::default(),
            now(),
        )
    }

    #[test]
    fn test_acquisition_below_threshold_no_transition() {
        assert!(check(&acquisition(4, 12, None)).is_empty());
    }

    #[test]
    fn test_graduation_seeds_continuity_ease() {
        let patch = check(&acquisition(5, 12, None));

        assert_eq!(patch.phase, Some(Phase::Maintenance));
        assert_eq!(patch.ease_factor, Some(2.0));
        assert_eq!(patch.repetitions, Some(2));
        assert_eq!(patch.interval, Some(12));
        assert!(!patch.discard_focus_data);
    }

    #[test]
    fn test_graduation_ease_clamps_to_max() {
        let patch = check(&acquisition(6, 25, None));
        assert_eq!(patch.ease_factor, Some(3.0));
    }

    #[test]
    fn test_graduation_ease_clamps_to_min() {
        let patch = check(&acquisition(5, 3, None));
        assert_eq!(patch.ease_factor, Some(1.3));
    }

    #[test]
    fn test_graduation_never_lowers_existing_ease() {
        let patch = check(&acquisition(5, 12, Some(2.8)));
        assert_eq!(patch.ease_factor, Some(2.8));
    }

    #[test]
    fn test_graduation_raises_low_existing_ease() {
        let patch = check(&acquisition(5, 15, Some(1.6)));
        assert_eq!(patch.ease_factor, Some(2.5));
    }

    #[test]
    fn test_continuity_ease_reproduces_interval() {
        for interval in 1..=18 {
            let ease = continuity_ease_factor(interval);
            let next = (interval as f64 * ease).round() as u32;
            assert!(next >= interval);
        }
    }

    #[test]
    fn test_focus_recently_practiced_no_transition() {
        assert!(check(&focus(6, None)).is_empty());
    }

    #[test]
    fn test_focus_idle_preserves_next_review() {
        let paused = now() - Duration::days(2);
        let patch = check(&focus(7, Some(paused)));

        assert_eq!(patch.phase, Some(Phase::Maintenance));
        assert_eq!(patch.next_review, Some(paused));
        assert!(patch.discard_focus_data);
        assert_eq!(patch.ease_factor, None);
    }

    #[test]
    fn test_focus_idle_without_next_review_schedules_from_interval() {
        let patch = check(&focus(10, None));
        let last_practiced = now() - Duration::days(10);

        assert_eq!(patch.next_review, Some(last_practiced + Duration::days(4)));
    }

    #[test]
    fn test_apply_patch() {
        let skill = focus(9, None);
        let patch = check(&skill);
        let applied = patch.apply(&skill.progress);

        assert_eq!(applied.phase, Phase::Maintenance);
        assert!(applied.focus_data.is_none());
        assert_eq!(applied.interval, 4);
        assert_eq!(applied.ease_factor, 2.3);
        // input untouched
        assert!(skill.progress.focus_data.is_some());
    }

    #[test]
    fn test_other_phases_never_transition() {
        for phase in ["backlog", "maintenance", "archived"] {
            let record = SkillRecord {
                phase: Some(phase.to_string()),
                mode: Some("daily".to_string()),
                level: Some(20),
                last_practiced: Some(now() - Duration::days(60)),
                ..Default::default()
            };
            let skill = normalize(&record, XpTargetFormula::Gentle, now());
            assert!(check(&skill).is_empty(), "{} should not transition", phase);
        }
    }
}
