// ==========================================
// Club Session Scheduler - API request/response shapes
// ==========================================
// Clock times cross this boundary as club-local "HH:MM" strings; stored
// instants stay UTC and never appear here unconverted.
// ==========================================

use serde::{Deserialize, Serialize};

use crate::planner::dto::{PlanSummary, ProposedMatch, SessionPlanConfig};

// ==========================================
// Schedule preview
// ==========================================
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulePreviewRequest {
    pub start_time: String,
    pub end_time: String,
    pub num_courts: u32,
    pub match_duration_minutes: i64,
    #[serde(default)]
    pub break_duration_minutes: Option<i64>,
    #[serde(default)]
    pub warmup_duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSlotKind {
    Warmup,
    Match,
    Break,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub round: u32,
    #[serde(rename = "type")]
    pub kind: ScheduleSlotKind,
    pub start_time: String,
    pub end_time: String,
    /// Only on match slots: simultaneous matches in this round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePreviewResponse {
    pub total_duration_minutes: i64,
    pub warmup_end_time: String,
    pub available_minutes: i64,
    pub max_rounds: u32,
    pub matches_per_round: u32,
    pub total_matches: u32,
    pub schedule: Vec<ScheduleSlot>,
    pub actual_end_time: String,
    pub utilization_percent: f64,
}

// ==========================================
// Match generation
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMatchesResponse {
    pub message: String,
    pub match_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiPreviewRequest {
    pub mode: String,
    #[serde(default)]
    pub match_duration_minutes: Option<i64>,
    #[serde(default)]
    pub break_duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiPreviewResponse {
    /// Always true; nothing was persisted.
    pub preview: bool,
    pub mode: String,
    pub session_config: SessionPlanConfig,
    pub matches: Vec<ProposedMatch>,
    pub summary: PlanSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmMatchesRequest {
    pub matches: Vec<ConfirmMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmMatch {
    pub match_number: u32,
    pub match_type: String,
    pub court_number: u32,
    /// Club-local "HH:MM".
    pub scheduled_time: String,
    pub team_a: ConfirmTeam,
    pub team_b: ConfirmTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmTeam {
    /// Session-participant row ids from the previewed plan.
    pub player_ids: Vec<i64>,
}

// ==========================================
// Scores and rankings
// ==========================================
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreUpdateRequest {
    #[serde(default)]
    pub team_a_score: Option<i32>,
    #[serde(default)]
    pub team_b_score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubRankingUpdateResponse {
    pub message: String,
    pub updated_members: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRankingUpdateResponse {
    pub message: String,
    pub total_members: usize,
}
