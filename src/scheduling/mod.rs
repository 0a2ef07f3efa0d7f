// Scheduling Module - spaced-repetition engine
//
// Components:
// - calendar: weekly training-day resolver
// - normalize: fills legacy/partial records with logged defaults
// - retention: ease factor / interval / repetition updates
// - next_review: next review date from an updated record
// - focus: XP progression for the focus phase
// - transition: automatic phase changes
// - engine: call contracts used by orchestrators

pub mod calendar;
pub mod engine;
pub mod focus;
pub mod next_review;
pub mod normalize;
pub mod retention;
pub mod transition;

pub use calendar::TrainingCalendar;
pub use engine::{PracticeOutcome, SchedulingEngine};
pub use focus::XpTargetFormula;
pub use next_review::{resolve_next_review, ReviewStrategy};
pub use normalize::{normalize, Fallback, Normalized};
pub use retention::{update_retention, RetentionState, RetentionUpdate};
pub use transition::{check_auto_transition, TransitionPatch, TransitionRules};
