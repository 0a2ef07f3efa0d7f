// Focus XP Progression
//
// Gamified progress for skills in the focus phase. Each session awards XP by
// quality; once XP reaches 75% of the level target the skill is flagged as
// ready for a level-up. The flag is sticky until the level-up reset.

use crate::types::{FocusData, Quality};
use serde::{Deserialize, Serialize};

/// Formula for the XP a level requires
///
/// Two formulas have been in use for the same quantity and they diverge for
/// every level above 1. `Gentle` is canonical; `Steep` is only used when
/// configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpTargetFormula {
    /// `floor(6 + level / 3)`
    #[default]
    Gentle,
    /// `ceil(level * 10 + (level - 1) * 5)`, at least 1
    Steep,
}

impl XpTargetFormula {
    pub fn target_xp(&self, level: u32) -> u32 {
        match self {
            XpTargetFormula::Gentle => 6 + level / 3,
            XpTargetFormula::Steep => {
                let target = level as i64 * 10 + (level as i64 - 1) * 5;
                target.clamp(1, u32::MAX as i64) as u32
            }
        }
    }
}

/// XP awarded for one focus session
pub fn xp_award(quality: Quality) -> u32 {
    match quality {
        Quality::Forgotten => 0,
        Quality::Hard => 1,
        Quality::Good => 2,
        Quality::VeryEasy => 3,
    }
}

/// XP at which a level-up is suggested: `ceil(target * 0.75)`
pub fn level_up_threshold(target_xp: u32) -> u32 {
    (target_xp as u64 * 3).div_ceil(4) as u32
}

/// Record one focus session
///
/// Missing focus data starts fresh with the target for `level`.
pub fn progress_focus(
    current: Option<&FocusData>,
    level: u32,
    quality: Quality,
    formula: XpTargetFormula,
) -> FocusData {
    let mut next = match current {
        Some(data) => data.clone(),
        None => {
            tracing::debug!("Initializing focus data at level {}", level);
            FocusData::new(formula.target_xp(level))
        }
    };

    next.total_sessions = next.total_sessions.saturating_add(1);
    next.consecutive_good_sessions = if quality.is_success() {
        next.consecutive_good_sessions.saturating_add(1)
    } else {
        0
    };
    next.current_xp = next.current_xp.saturating_add(xp_award(quality));
    next.last_quality = Some(quality);

    if !next.ready_for_level_up && next.current_xp >= level_up_threshold(next.target_xp) {
        tracing::info!(
            "Ready for level-up: {} / {} XP",
            next.current_xp,
            next.target_xp
        );
        next.ready_for_level_up = true;
    }

    next
}

/// Reset XP after the user commits a level increase
///
/// Session counters carry over.
pub fn reset_for_level_up(current: &FocusData, new_level: u32, formula: XpTargetFormula) -> FocusData {
    FocusData {
        current_xp: 0,
        target_xp: formula.target_xp(new_level),
        ready_for_level_up: false,
        ..current.clone()
    }
}
