// Next-Review Resolver
//
// Turns an already-updated skill into a concrete review date. The interval is
// consumed exactly as the update engine produced it; nothing here looks at the
// quality score to move it.
//
// Dispatch is a closed table over (phase, mode):
//
//   backlog / archived        now + 3650 days
//   acquisition, maintenance  daily: last practiced + interval days
//                             weekly: last practiced + interval weeks, snapped
//   focus                     daily: now + 1 day
//                             weekly: next training day after now

use super::calendar::{shift_days, TrainingCalendar};
use crate::types::{Mode, Phase, Quality, SkillProgress};
use chrono::{DateTime, Utc};

/// Horizon used for skills that are not scheduled
pub const NEVER_REVIEW_DAYS: i64 = 3650;

/// How a (phase, mode) pair turns into a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStrategy {
    /// Effectively never
    Parked,
    /// `interval` calendar days after the last practice
    IntervalDays,
    /// `interval` weeks after the last practice, snapped to a training day
    IntervalWeeksSnapped,
    /// Tomorrow
    NextDay,
    /// Next training day after now
    NextTrainingDay,
}

impl ReviewStrategy {
    pub fn for_skill(phase: Phase, mode: Mode) -> Self {
        match (phase, mode) {
            (Phase::Backlog | Phase::Archived, _) => ReviewStrategy::Parked,
            (Phase::Acquisition | Phase::Maintenance, Mode::Daily) => ReviewStrategy::IntervalDays,
            (Phase::Acquisition | Phase::Maintenance, Mode::Weekly) => {
                ReviewStrategy::IntervalWeeksSnapped
            }
            (Phase::Focus, Mode::Daily) => ReviewStrategy::NextDay,
            (Phase::Focus, Mode::Weekly) => ReviewStrategy::NextTrainingDay,
        }
    }
}

/// Resolve the next review date for an already-updated skill
pub fn resolve_next_review(
    progress: &SkillProgress,
    quality: Quality,
    calendar: &TrainingCalendar,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let strategy = ReviewStrategy::for_skill(progress.phase, progress.mode);

    let next = match strategy {
        ReviewStrategy::Parked => shift_days(now, NEVER_REVIEW_DAYS),
        ReviewStrategy::IntervalDays => shift_days(progress.last_practiced, progress.interval as i64),
        ReviewStrategy::IntervalWeeksSnapped => {
            calendar.add_weeks_snapped(progress.last_practiced, progress.interval)
        }
        ReviewStrategy::NextDay => shift_days(now, 1),
        ReviewStrategy::NextTrainingDay => calendar.next_training_day(now),
    };

    tracing::trace!(
        "Next review via {:?} (quality {}, interval {}): {}",
        strategy,
        quality,
        progress.interval,
        next
    );

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Weekday};

    fn sunday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap()
    }

    fn skill(phase: Phase, mode: Mode, interval: u32) -> SkillProgress {
        SkillProgress {
            interval,
            ..SkillProgress::new(phase, mode, sunday())
        }
    }

    #[test]
    fn test_strategy_table() {
        use ReviewStrategy::*;

        for mode in [Mode::Daily, Mode::Weekly] {
            assert_eq!(ReviewStrategy::for_skill(Phase::Backlog, mode), Parked);
            assert_eq!(ReviewStrategy::for_skill(Phase::Archived, mode), Parked);
        }
        assert_eq!(
            ReviewStrategy::for_skill(Phase::Maintenance, Mode::Weekly),
            IntervalWeeksSnapped
        );
        assert_eq!(
            ReviewStrategy::for_skill(Phase::Acquisition, Mode::Daily),
            IntervalDays
        );
        assert_eq!(ReviewStrategy::for_skill(Phase::Focus, Mode::Daily), NextDay);
        assert_eq!(
            ReviewStrategy::for_skill(Phase::Focus, Mode::Weekly),
            NextTrainingDay
        );
    }

    #[test]
    fn test_parked_phases_are_ten_years_out() {
        let calendar = TrainingCalendar::default();
        let now = sunday() + Duration::days(2);

        for phase in [Phase::Backlog, Phase::Archived] {
            let next = resolve_next_review(&skill(phase, Mode::Daily, 4), Quality::Good, &calendar, now);
            assert_eq!(next, now + Duration::days(3650));
        }
    }

    #[test]
    fn test_daily_uses_interval_as_given() {
        let calendar = TrainingCalendar::default();
        let progress = skill(Phase::Acquisition, Mode::Daily, 4);

        for quality in Quality::ALL {
            let next = resolve_next_review(&progress, quality, &calendar, sunday());
            assert_eq!(next, sunday() + Duration::days(4));
        }
    }

    #[test]
    fn test_weekly_snaps_to_training_day() {
        let calendar = TrainingCalendar::new([1, 3, 5]).unwrap();
        let progress = skill(Phase::Maintenance, Mode::Weekly, 2);

        let next = resolve_next_review(&progress, Quality::VeryEasy, &calendar, sunday());
        assert_eq!(next, sunday() + Duration::days(15));
        assert_eq!(next.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_weekly_keeps_same_day_when_already_training_day() {
        let calendar = TrainingCalendar::new([0]).unwrap();
        let progress = skill(Phase::Acquisition, Mode::Weekly, 1);

        let next = resolve_next_review(&progress, Quality::Good, &calendar, sunday());
        assert_eq!(next, sunday() + Duration::days(7));
    }

    #[test]
    fn test_stored_interval_beyond_calendar_range_saturates() {
        let calendar = TrainingCalendar::default();

        let daily = skill(Phase::Maintenance, Mode::Daily, u32::MAX);
        let next = resolve_next_review(&daily, Quality::Good, &calendar, sunday());
        assert_eq!(next, DateTime::<Utc>::MAX_UTC);

        let weekly = skill(Phase::Acquisition, Mode::Weekly, 20_000_000);
        let next = resolve_next_review(&weekly, Quality::Good, &calendar, sunday());
        assert_eq!(next, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_focus_daily_is_tomorrow_regardless_of_quality() {
        let calendar = TrainingCalendar::default();
        let progress = skill(Phase::Focus, Mode::Daily, 9);
        let now = sunday() + Duration::days(10);

        for quality in Quality::ALL {
            assert_eq!(
                resolve_next_review(&progress, quality, &calendar, now),
                now + Duration::days(1)
            );
        }
    }

    #[test]
    fn test_focus_weekly_is_next_training_day_from_now() {
        let calendar = TrainingCalendar::new([1, 3, 5]).unwrap();
        let progress = skill(Phase::Focus, Mode::Weekly, 9);
        let monday = sunday() + Duration::days(1);

        let next = resolve_next_review(&progress, Quality::Good, &calendar, monday);
        assert_eq!(next.weekday(), Weekday::Wed);
        assert_eq!(next - monday, Duration::days(2));
    }
}
