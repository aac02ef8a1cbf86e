// ==========================================
// Club Session Scheduler - domain layer
// ==========================================
// Entities and type-safe enums only. No I/O, no SQL, no business rules
// beyond local invariants.
// ==========================================

pub mod matches;
pub mod ranking;
pub mod session;
pub mod types;

pub use matches::{derive_winner, Match, MatchParticipant, MatchResult, PlannedMatch, TeamSlots};
pub use ranking::{
    MemberTally, Ranking, RankingScope, RankingSnapshot, POINTS_PER_DRAW, POINTS_PER_WIN,
};
pub use session::{ParticipantRef, Session, SessionParticipant};
pub use types::{
    Gender, MatchStatus, MatchType, MemberRole, MemberStatus, ParticipantCategory, SeasonStatus,
    SessionStatus, Team,
};
