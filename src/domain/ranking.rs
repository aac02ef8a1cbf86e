// ==========================================
// Club Session Scheduler - ranking domain model
// ==========================================
// Aggregate win/loss/draw/point tallies per club member. Rows are
// recomputed wholesale on every aggregation run and upserted, never merged.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points per win / per draw used everywhere rankings are computed.
pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

// ==========================================
// RankingScope - what history a tally covers
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingScope {
    /// All completed matches of the club.
    Club { club_id: i64 },
    /// Completed matches of the club's sessions assigned to one season.
    Season { club_id: i64, season_id: i64 },
}

impl RankingScope {
    pub fn club_id(&self) -> i64 {
        match self {
            RankingScope::Club { club_id } | RankingScope::Season { club_id, .. } => *club_id,
        }
    }
}

// ==========================================
// MemberTally - in-memory aggregation line
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTally {
    pub total_matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl MemberTally {
    pub fn points(&self) -> u32 {
        self.wins * POINTS_PER_WIN + self.draws * POINTS_PER_DRAW
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_matches == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total_matches) * 100.0
        }
    }
}

// ==========================================
// Ranking - one persisted row
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    pub id: i64,
    pub scope: RankingScope,
    pub club_member_id: i64,
    pub total_matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub last_updated: DateTime<Utc>,
}

impl Ranking {
    pub fn win_rate(&self) -> f64 {
        if self.total_matches == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total_matches) * 100.0
        }
    }
}

// ==========================================
// RankingSnapshot - planner-facing view of a member's standing
// ==========================================
// Sent to the balanced planner so it can pair high- and low-ranked
// players on the same team.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

impl From<&Ranking> for RankingSnapshot {
    fn from(r: &Ranking) -> Self {
        Self {
            points: r.points,
            wins: r.wins,
            losses: r.losses,
            win_rate: r.win_rate(),
        }
    }
}
