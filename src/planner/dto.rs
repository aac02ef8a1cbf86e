// ==========================================
// Club Session Scheduler - planner request/response shapes
// ==========================================
// The raw structs mirror the upstream JSON exactly and are never exposed
// outside this module tree; validation turns them into the typed proposal.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ranking::RankingSnapshot;
use crate::domain::types::{Gender, MatchType};

// ==========================================
// PlannerMode
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerMode {
    /// Pair high- and low-ranked players on the same team.
    Balanced,
    /// Ignore skill entirely.
    Random,
}

impl fmt::Display for PlannerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerMode::Balanced => write!(f, "balanced"),
            PlannerMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for PlannerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(PlannerMode::Balanced),
            "random" => Ok(PlannerMode::Random),
            other => Err(format!("unknown planner mode '{other}'")),
        }
    }
}

// ==========================================
// Request side
// ==========================================
/// One roster entry as the planner sees it. `id` is the session-participant
/// row id, which is unambiguous across members, guests and associates; the
/// confirm path resolves it back against the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerParticipant {
    pub id: i64,
    pub name: String,
    pub gender: Option<Gender>,
    pub match_type: MatchType,
    pub ranking: RankingSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlanConfig {
    /// Club-local clock strings, "HH:MM".
    pub start_time: String,
    pub end_time: String,
    pub match_duration_minutes: i64,
    pub break_duration_minutes: i64,
    pub num_courts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPlanRequest {
    pub participants: Vec<PlannerParticipant>,
    pub config: SessionPlanConfig,
    pub mode: PlannerMode,
}

// ==========================================
// Raw wire shapes (upstream JSON, untrusted)
// ==========================================
#[derive(Debug, Clone, Deserialize)]
pub struct RawProposal {
    #[serde(default)]
    pub matches: Vec<RawMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub match_number: u32,
    pub match_type: String,
    pub court_number: u32,
    pub scheduled_time: String,
    pub team_a: RawTeam,
    pub team_b: RawTeam,
    #[serde(default)]
    pub balance_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub player_ids: Vec<i64>,
    #[serde(default)]
    pub player_names: Vec<String>,
}

// ==========================================
// Validated proposal
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedTeam {
    pub player_ids: Vec<i64>,
    pub player_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedMatch {
    pub match_number: u32,
    pub match_type: MatchType,
    pub court_number: u32,
    /// Club-local "HH:MM"; validated to parse.
    pub scheduled_time: String,
    pub team_a: ProposedTeam,
    pub team_b: ProposedTeam,
    pub balance_score: Option<f64>,
}

/// Per-type counts, always recomputed locally from the match list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_matches: usize,
    pub singles_matches: usize,
    pub mens_doubles_matches: usize,
    pub womens_doubles_matches: usize,
    pub mixed_doubles_matches: usize,
}

impl PlanSummary {
    pub fn from_matches(matches: &[ProposedMatch]) -> Self {
        let mut summary = PlanSummary {
            total_matches: matches.len(),
            ..Default::default()
        };
        for m in matches {
            match m.match_type {
                MatchType::Singles => summary.singles_matches += 1,
                MatchType::MensDoubles => summary.mens_doubles_matches += 1,
                MatchType::WomensDoubles => summary.womens_doubles_matches += 1,
                MatchType::MixedDoubles => summary.mixed_doubles_matches += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanProposal {
    pub matches: Vec<ProposedMatch>,
    pub summary: PlanSummary,
}
