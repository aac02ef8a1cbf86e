// ==========================================
// Club Session Scheduler - external match planner
// ==========================================
// Preview-only planning through an external text-generation model. Nothing
// in this tree touches the database; confirmed proposals are materialized
// by the session API.
// ==========================================

pub mod dto;
pub mod error;
pub mod prompt;
pub mod remote;
pub mod validate;

pub use dto::{
    MatchPlanRequest, PlanProposal, PlanSummary, PlannerMode, PlannerParticipant, ProposedMatch,
    ProposedTeam, SessionPlanConfig,
};
pub use error::{PlannerError, PlannerResult};
pub use remote::{BalancedMatchPlanner, RemotePlannerClient};
