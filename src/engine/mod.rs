// ==========================================
// Club Session Scheduler - engine layer
// ==========================================
// Pure business algorithms. No SQL, no network, no clocks other than the
// inputs; every function is reproducible from its arguments (randomized
// pairing takes an injected seeded RNG).
// ==========================================

pub mod classifier;
pub mod ranking;
pub mod round_robin;
pub mod time_slot;

pub use classifier::{classify_roster, effective_match_type, ClassifiedPools};
pub use ranking::{aggregate_results, CompletedMatch};
pub use round_robin::RoundRobinGenerator;
pub use time_slot::{PlannedRound, ScheduleRequest, SchedulePlan, TimeSlotPlanner};

use thiserror::Error;

/// Engine-layer error type.
///
/// The engines only ever fail on inputs that violate their preconditions;
/// everything else is a normal (possibly empty) plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("roster too small: {actual} participant(s), minimum {minimum}")]
    RosterTooSmall { actual: usize, minimum: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
