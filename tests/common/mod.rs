//! Common test utilities and fixtures

use chrono::{DateTime, Duration, TimeZone, Utc};
use skilltrack_core::{SkillRecord, TrainingCalendar};

/// 2024-03-03, a Sunday
pub fn sunday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 3, 8, 0, 0).unwrap()
}

/// Sunday plus `days`
pub fn day(days: i64) -> DateTime<Utc> {
    sunday() + Duration::days(days)
}

/// Mon/Wed/Fri
pub fn mon_wed_fri() -> TrainingCalendar {
    TrainingCalendar::new([1, 3, 5]).expect("valid training days")
}

/// Fully populated record last practiced on `sunday()`
pub fn skill_record(phase: &str, mode: &str) -> SkillRecord {
    SkillRecord {
        id: Some(format!("{}-{}-skill", phase, mode)),
        phase: Some(phase.to_string()),
        mode: Some(mode.to_string()),
        level: Some(1),
        ease_factor: Some(2.5),
        interval: Some(1),
        repetitions: Some(0),
        last_practiced: Some(sunday()),
        next_review: None,
        focus_data: None,
    }
}
