// ==========================================
// Club Session Scheduler - match domain model
// ==========================================
// A match is one contest between two fixed-size teams on one court. Teams
// are modeled as 2-slot arrays (slot 2 unused for singles) instead of loose
// position integers.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::session::ParticipantRef;
use crate::domain::types::{MatchStatus, MatchType, Team};

// ==========================================
// Match
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub session_id: i64,
    pub match_number: u32,
    pub court_number: u32,
    pub match_type: MatchType,
    pub status: MatchStatus,
    /// Scheduled start instant, stored UTC.
    pub scheduled_at: DateTime<Utc>,
}

// ==========================================
// MatchParticipant - one slot in one team
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub id: i64,
    pub match_id: i64,
    pub participant: ParticipantRef,
    pub team: Team,
    /// 1 or 2; singles only uses 1.
    pub position: u8,
}

// ==========================================
// TeamSlots - fixed two-slot team lineup
// ==========================================
// The generator and planner build lineups with this shape before anything
// is persisted; the repository flattens it into participant rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSlots {
    pub slots: [Option<ParticipantRef>; 2],
}

impl TeamSlots {
    pub fn singles(player: ParticipantRef) -> Self {
        Self {
            slots: [Some(player), None],
        }
    }

    pub fn doubles(first: ParticipantRef, second: ParticipantRef) -> Self {
        Self {
            slots: [Some(first), Some(second)],
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &ParticipantRef> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==========================================
// PlannedMatch - one match of a not-yet-persisted plan
// ==========================================
// Output shape shared by the round-robin generator and the confirmed
// balanced-planner proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMatch {
    pub match_number: u32,
    pub court_number: u32,
    pub match_type: MatchType,
    pub scheduled_at: DateTime<Utc>,
    pub team_a: TeamSlots,
    pub team_b: TeamSlots,
}

impl PlannedMatch {
    /// Both teams carry exactly `match_type.team_size()` players and no
    /// player appears twice.
    pub fn is_well_formed(&self) -> bool {
        let size = self.match_type.team_size();
        if self.team_a.len() != size || self.team_b.len() != size {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.team_a
            .players()
            .chain(self.team_b.players())
            .all(|p| seen.insert((p.category(), p.entity_id())))
    }
}

// ==========================================
// MatchResult - one-to-one with Match
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: i64,
    pub match_id: i64,
    pub team_a_score: i32,
    pub team_b_score: i32,
    /// Set only when the scores differ.
    pub winner_team: Option<Team>,
    pub recorded_at: DateTime<Utc>,
}

/// Winner derivation: the team with the strictly higher score, None on a tie.
pub fn derive_winner(team_a_score: i32, team_b_score: i32) -> Option<Team> {
    match team_a_score.cmp(&team_b_score) {
        std::cmp::Ordering::Greater => Some(Team::A),
        std::cmp::Ordering::Less => Some(Team::B),
        std::cmp::Ordering::Equal => None,
    }
}
