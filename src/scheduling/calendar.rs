// Training Calendar
//
// Holds the set of weekdays the user trains on and snaps dates onto them.
// Weekday indices follow 0 = Sunday .. 6 = Saturday and are evaluated on the
// UTC calendar date of each timestamp. Time of day is carried through.
//
// The set can never be empty: construction and updates reject it, which is
// what bounds every search below to a single week.

use crate::error::{Result, SkillTrackError};
use chrono::{DateTime, Datelike, Duration, Utc};

/// Mon/Wed/Fri
pub const DEFAULT_TRAINING_DAYS: [u8; 3] = [1, 3, 5];

/// Weekly training schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingCalendar {
    days: [bool; 7],
}

impl TrainingCalendar {
    /// Build a calendar from weekday indices (0 = Sunday)
    ///
    /// Fails with [`SkillTrackError::EmptyTrainingSchedule`] when no day is
    /// given and [`SkillTrackError::InvalidWeekday`] for indices above 6.
    pub fn new<I>(days: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        Ok(Self {
            days: parse_days(days)?,
        })
    }

    /// Replace the training days. On error the current schedule is kept.
    pub fn set_training_days<I>(&mut self, days: I) -> Result<()>
    where
        I: IntoIterator<Item = u8>,
    {
        let parsed = parse_days(days)?;
        tracing::info!(
            "Training days changed: {:?} -> {:?}",
            self.training_days(),
            indices(&parsed)
        );
        self.days = parsed;
        Ok(())
    }

    /// Enabled weekday indices in ascending order
    pub fn training_days(&self) -> Vec<u8> {
        indices(&self.days)
    }

    pub fn is_training_day(&self, date: DateTime<Utc>) -> bool {
        self.days[weekday_index(date)]
    }

    /// Earliest training day strictly after `from`
    pub fn next_training_day(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let start = weekday_index(from);
        // The same weekday one week later always qualifies.
        let offset = (1..=7)
            .find(|offset| self.days[(start + offset) % 7])
            .unwrap_or(7);
        shift_days(from, offset as i64)
    }

    /// Latest training day strictly before `from`
    pub fn previous_training_day(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let start = weekday_index(from);
        let offset = (1..=7)
            .find(|offset| self.days[(start + 7 - offset) % 7])
            .unwrap_or(7);
        shift_days(from, -(offset as i64))
    }

    /// Add whole weeks, then move forward to a training day unless the
    /// result already is one
    pub fn add_weeks_snapped(&self, from: DateTime<Utc>, weeks: u32) -> DateTime<Utc> {
        let landed = shift_days(from, weeks as i64 * 7);
        if self.is_training_day(landed) {
            landed
        } else {
            self.next_training_day(landed)
        }
    }

    /// Number of training days among the calendar dates in `[start, end)`
    pub fn training_days_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
        let total = (end.date_naive() - start.date_naive()).num_days();
        if total <= 0 {
            return 0;
        }

        let per_week = self.days.iter().filter(|enabled| **enabled).count() as i64;
        let full_weeks = total / 7;
        let first = weekday_index(start);
        let remainder = (0..(total % 7) as usize)
            .filter(|offset| self.days[(first + offset) % 7])
            .count() as i64;

        (full_weeks * per_week + remainder) as u32
    }
}

impl Default for TrainingCalendar {
    fn default() -> Self {
        let mut days = [false; 7];
        for day in DEFAULT_TRAINING_DAYS {
            days[day as usize] = true;
        }
        Self { days }
    }
}

/// Move a timestamp by whole days, saturating at chrono's representable range
pub fn shift_days(date: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let shifted = Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta));
    match shifted {
        Some(shifted) => shifted,
        None if days < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

fn weekday_index(date: DateTime<Utc>) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

fn parse_days<I>(days: I) -> Result<[bool; 7]>
where
    I: IntoIterator<Item = u8>,
{
    let mut parsed = [false; 7];
    for day in days {
        if day > 6 {
            return Err(SkillTrackError::InvalidWeekday(day));
        }
        parsed[day as usize] = true;
    }

    if !parsed.iter().any(|enabled| *enabled) {
        tracing::error!("Rejected empty training schedule");
        return Err(SkillTrackError::EmptyTrainingSchedule);
    }

    Ok(parsed)
}

fn indices(days: &[bool; 7]) -> Vec<u8> {
    (0u8..7).filter(|day| days[*day as usize]).collect()
}
