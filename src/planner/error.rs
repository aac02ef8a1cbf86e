// ==========================================
// Club Session Scheduler - planner error types
// ==========================================

use thiserror::Error;

/// Failures of the external match planner. Transport problems and
/// malformed proposals are kept apart so the caller can report them
/// differently; neither ever results in a partial plan.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("planner unavailable: {0}")]
    Unavailable(String),

    #[error("planner returned an unusable proposal: {0}")]
    BadResponse(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
