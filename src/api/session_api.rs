// ==========================================
// Club Session Scheduler - session scheduling API
// ==========================================
// The manager-facing operations: schedule preview, round-robin generation,
// planner preview/confirm, and score recording. Permission and validation
// failures are raised before any mutation.
// ==========================================

use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::api::dto::{
    AiPreviewRequest, AiPreviewResponse, ConfirmMatchesRequest, GenerateMatchesResponse,
    MessageResponse, SchedulePreviewRequest, SchedulePreviewResponse, ScheduleSlot,
    ScheduleSlotKind, ScoreUpdateRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::matches::{PlannedMatch, TeamSlots};
use crate::domain::ranking::RankingSnapshot;
use crate::domain::session::{ParticipantRef, Session, SessionParticipant};
use crate::domain::types::{MatchType, SessionStatus};
use crate::engine::{self, RoundRobinGenerator, ScheduleRequest, TimeSlotPlanner};
use crate::planner::dto::{MatchPlanRequest, PlannerMode, PlannerParticipant, SessionPlanConfig};
use crate::planner::BalancedMatchPlanner;
use crate::repository::{
    ClubRepository, MatchRepository, Membership, RankingRepository, SessionRepository,
};
use crate::tz;

/// Minimum roster size for the external planner (two doubles teams).
const PLANNER_MIN_ROSTER: usize = 4;

// ==========================================
// SessionApi
// ==========================================
pub struct SessionApi {
    clubs: Arc<ClubRepository>,
    sessions: Arc<SessionRepository>,
    matches: Arc<MatchRepository>,
    rankings: Arc<RankingRepository>,
    planner: Arc<dyn BalancedMatchPlanner>,
    /// Fixed generator seed; None draws from the OS. Tests pin this.
    rng_seed: Option<u64>,
}

impl SessionApi {
    pub fn new(
        clubs: Arc<ClubRepository>,
        sessions: Arc<SessionRepository>,
        matches: Arc<MatchRepository>,
        rankings: Arc<RankingRepository>,
        planner: Arc<dyn BalancedMatchPlanner>,
    ) -> Self {
        Self {
            clubs,
            sessions,
            matches,
            rankings,
            planner,
            rng_seed: None,
        }
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    // ==========================================
    // schedule preview
    // ==========================================
    /// Pure preview of the round structure; reads the session only to
    /// confirm it exists, persists nothing.
    pub fn schedule_preview(
        &self,
        session_id: i64,
        req: &SchedulePreviewRequest,
    ) -> ApiResult<SchedulePreviewResponse> {
        self.load_session(session_id)?;

        let start_time = parse_clock(&req.start_time, "start_time")?;
        let end_time = parse_clock(&req.end_time, "end_time")?;
        let plan = TimeSlotPlanner::plan(&ScheduleRequest {
            start_time,
            end_time,
            num_courts: req.num_courts,
            match_duration_minutes: req.match_duration_minutes,
            break_duration_minutes: req.break_duration_minutes.unwrap_or(0),
            warmup_duration_minutes: req.warmup_duration_minutes.unwrap_or(0),
        })?;

        let mut schedule = Vec::new();
        if req.warmup_duration_minutes.unwrap_or(0) > 0 {
            schedule.push(ScheduleSlot {
                round: 0,
                kind: ScheduleSlotKind::Warmup,
                start_time: tz::format_clock_time(start_time),
                end_time: tz::format_clock_time(plan.warmup_end_time),
                matches_count: None,
            });
        }
        for round in &plan.rounds {
            schedule.push(ScheduleSlot {
                round: round.round,
                kind: ScheduleSlotKind::Match,
                start_time: tz::format_clock_time(round.match_start),
                end_time: tz::format_clock_time(round.match_end),
                matches_count: Some(plan.matches_per_round),
            });
            if let (Some(break_start), Some(break_end)) = (round.break_start, round.break_end) {
                schedule.push(ScheduleSlot {
                    round: round.round,
                    kind: ScheduleSlotKind::Break,
                    start_time: tz::format_clock_time(break_start),
                    end_time: tz::format_clock_time(break_end),
                    matches_count: None,
                });
            }
        }

        Ok(SchedulePreviewResponse {
            total_duration_minutes: plan.total_duration_minutes,
            warmup_end_time: tz::format_clock_time(plan.warmup_end_time),
            available_minutes: plan.available_minutes,
            max_rounds: plan.max_rounds,
            matches_per_round: plan.matches_per_round,
            total_matches: plan.total_matches,
            schedule,
            actual_end_time: tz::format_clock_time(plan.actual_end_time),
            utilization_percent: plan.utilization_percent,
        })
    }

    // ==========================================
    // round-robin generation
    // ==========================================
    /// Generate and persist the round-robin plan, replacing any existing
    /// matches of the session.
    pub fn generate_matches(
        &self,
        session_id: i64,
        actor_user_id: i64,
    ) -> ApiResult<GenerateMatchesResponse> {
        let session = self.load_session(session_id)?;
        self.require_manager(session.club_id, actor_user_id)?;

        let roster = self.sessions.find_roster(session_id)?;
        let mut rng = self.make_rng();
        let plan = RoundRobinGenerator::generate(&session, &roster, &mut rng)?;

        let match_ids = self.matches.replace_session_matches(session_id, &plan)?;
        self.sessions
            .update_status(session_id, SessionStatus::Confirmed)?;
        info!(
            session_id,
            matches = match_ids.len(),
            roster = roster.len(),
            "round-robin plan persisted"
        );

        Ok(GenerateMatchesResponse {
            message: format!("{} matches generated", match_ids.len()),
            match_ids,
        })
    }

    // ==========================================
    // planner preview
    // ==========================================
    /// Ask the external planner for a plan. Advisory only: the response is
    /// returned to the caller and nothing is persisted until confirmation.
    pub async fn generate_ai_preview(
        &self,
        session_id: i64,
        actor_user_id: i64,
        req: &AiPreviewRequest,
    ) -> ApiResult<AiPreviewResponse> {
        let session = self.load_session(session_id)?;
        self.require_manager(session.club_id, actor_user_id)?;

        let mode = PlannerMode::from_str(&req.mode).map_err(ApiError::InvalidInput)?;

        let roster = self.sessions.find_roster(session_id)?;
        if roster.len() < PLANNER_MIN_ROSTER {
            return Err(ApiError::InvalidInput(format!(
                "planner needs at least {PLANNER_MIN_ROSTER} participants, roster has {}",
                roster.len()
            )));
        }

        let mut participants = Vec::with_capacity(roster.len());
        for entry in &roster {
            participants.push(self.planner_participant(session.club_id, entry)?);
        }

        let config = SessionPlanConfig {
            start_time: tz::format_clock_time(session.start_time),
            end_time: tz::format_clock_time(session.end_time),
            match_duration_minutes: req
                .match_duration_minutes
                .unwrap_or(session.match_duration_minutes),
            break_duration_minutes: req
                .break_duration_minutes
                .unwrap_or_else(|| session.break_minutes()),
            num_courts: session.num_courts,
        };

        let request = MatchPlanRequest {
            participants,
            config: config.clone(),
            mode,
        };
        let proposal = self.planner.propose(&request).await?;
        info!(
            session_id,
            %mode,
            matches = proposal.matches.len(),
            "planner preview produced"
        );

        Ok(AiPreviewResponse {
            preview: true,
            mode: mode.to_string(),
            session_config: config,
            matches: proposal.matches,
            summary: proposal.summary,
        })
    }

    // ==========================================
    // planner confirmation
    // ==========================================
    /// Materialize a previously previewed plan. Participant ids are resolved
    /// against the current roster snapshot; an id with no roster entry is
    /// skipped rather than failing the confirmation, and a match whose teams
    /// end up empty is dropped. Matches are renumbered sequentially.
    pub fn confirm_ai_matches(
        &self,
        session_id: i64,
        actor_user_id: i64,
        req: &ConfirmMatchesRequest,
    ) -> ApiResult<GenerateMatchesResponse> {
        let session = self.load_session(session_id)?;
        self.require_manager(session.club_id, actor_user_id)?;

        if req.matches.is_empty() {
            return Err(ApiError::InvalidInput(
                "confirmation carries no matches".to_string(),
            ));
        }

        let roster = self.sessions.find_roster(session_id)?;
        let mut plan = Vec::with_capacity(req.matches.len());
        let mut skipped_slots = 0usize;

        for m in &req.matches {
            let match_type = MatchType::from_str(&m.match_type)
                .map_err(|_| ApiError::InvalidInput(format!("unknown match type '{}'", m.match_type)))?;
            if m.court_number < 1 || m.court_number > session.num_courts {
                return Err(ApiError::InvalidInput(format!(
                    "match {}: court {} outside 1..={}",
                    m.match_number, m.court_number, session.num_courts
                )));
            }
            let clock = parse_clock(&m.scheduled_time, "scheduled_time")?;
            let scheduled_at = tz::local_date_time_to_utc(session.session_date, clock);

            let (team_a, missed_a) = resolve_team(&m.team_a.player_ids, &roster);
            let (team_b, missed_b) = resolve_team(&m.team_b.player_ids, &roster);
            skipped_slots += missed_a + missed_b;

            if team_a.is_empty() || team_b.is_empty() {
                continue;
            }

            plan.push(PlannedMatch {
                match_number: (plan.len() + 1) as u32,
                court_number: m.court_number,
                match_type,
                scheduled_at,
                team_a,
                team_b,
            });
        }

        if plan.is_empty() {
            return Err(ApiError::InvalidInput(
                "no confirmable matches after roster resolution".to_string(),
            ));
        }

        let match_ids = self.matches.replace_session_matches(session_id, &plan)?;
        self.sessions
            .update_status(session_id, SessionStatus::Confirmed)?;
        info!(
            session_id,
            matches = match_ids.len(),
            skipped_slots,
            "planner plan confirmed"
        );

        Ok(GenerateMatchesResponse {
            message: format!("{} matches confirmed", match_ids.len()),
            match_ids,
        })
    }

    // ==========================================
    // score recording
    // ==========================================
    /// Record one or both team scores. Missing halves of a partial update
    /// fall back to the previously recorded score, then zero; every write
    /// re-derives the winner and marks the match completed.
    pub fn update_match_score(
        &self,
        session_id: i64,
        match_id: i64,
        actor_user_id: i64,
        req: &ScoreUpdateRequest,
    ) -> ApiResult<MessageResponse> {
        let session = self.load_session(session_id)?;
        self.require_manager(session.club_id, actor_user_id)?;

        if req.team_a_score.is_none() && req.team_b_score.is_none() {
            return Err(ApiError::InvalidInput("no score provided".to_string()));
        }
        if req.team_a_score.is_some_and(|s| s < 0) || req.team_b_score.is_some_and(|s| s < 0) {
            return Err(ApiError::InvalidInput(
                "scores must be non-negative".to_string(),
            ));
        }

        let stored = self
            .matches
            .find_by_id(match_id)?
            .filter(|m| m.session_id == session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Match with id={match_id}")))?;

        let previous = self.matches.find_result(match_id)?;
        let team_a_score = req
            .team_a_score
            .or(previous.as_ref().map(|r| r.team_a_score))
            .unwrap_or(0);
        let team_b_score = req
            .team_b_score
            .or(previous.as_ref().map(|r| r.team_b_score))
            .unwrap_or(0);

        let result = self
            .matches
            .record_score(match_id, team_a_score, team_b_score)?;
        info!(
            session_id,
            match_id,
            match_number = stored.match_number,
            team_a_score,
            team_b_score,
            winner = ?result.winner_team,
            "score recorded"
        );

        let message = match result.winner_team {
            Some(team) => format!("score recorded, team {team} wins"),
            None => "score recorded, draw".to_string(),
        };
        Ok(MessageResponse { message })
    }

    // ==========================================
    // shared helpers
    // ==========================================
    fn load_session(&self, session_id: i64) -> ApiResult<Session> {
        self.sessions
            .find_by_id(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Session with id={session_id}")))
    }

    fn require_manager(&self, club_id: i64, user_id: i64) -> ApiResult<Membership> {
        let membership = self
            .clubs
            .find_membership(club_id, user_id)?
            .ok_or_else(|| {
                ApiError::PermissionDenied(format!("user {user_id} is not a member of club {club_id}"))
            })?;
        if !membership.is_active_manager() {
            return Err(ApiError::PermissionDenied(format!(
                "user {user_id} is not an active manager of club {club_id}"
            )));
        }
        Ok(membership)
    }

    fn make_rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Roster entry as the planner sees it. Members carry their current
    /// club-scope standing; guests and associates have none and get the
    /// zeroed snapshot.
    fn planner_participant(
        &self,
        club_id: i64,
        entry: &SessionParticipant,
    ) -> ApiResult<PlannerParticipant> {
        let ranking = match entry.participant.club_member_id() {
            Some(member_id) => self.rankings.snapshot_for_member(club_id, member_id)?,
            None => RankingSnapshot::default(),
        };
        Ok(PlannerParticipant {
            id: entry.id,
            name: entry.participant.display_name(),
            gender: entry.participant.gender(),
            match_type: engine::effective_match_type(entry),
            ranking,
        })
    }
}

fn parse_clock(s: &str, field: &str) -> ApiResult<chrono::NaiveTime> {
    tz::parse_clock_time(s)
        .ok_or_else(|| ApiError::InvalidInput(format!("{field} '{s}' is not HH:MM")))
}

/// Resolve planner ids (session-participant row ids) to roster entries.
/// Returns the filled team and the number of ids that matched nothing.
fn resolve_team(player_ids: &[i64], roster: &[SessionParticipant]) -> (TeamSlots, usize) {
    let mut slots: Vec<ParticipantRef> = Vec::with_capacity(2);
    let mut skipped = 0;
    for id in player_ids {
        match roster.iter().find(|entry| entry.id == *id) {
            Some(entry) if slots.len() < 2 => slots.push(entry.participant.clone()),
            Some(_) => skipped += 1,
            None => skipped += 1,
        }
    }
    let team = match slots.len() {
        0 => TeamSlots { slots: [None, None] },
        1 => TeamSlots {
            slots: [slots.pop(), None],
        },
        _ => {
            let second = slots.pop();
            let first = slots.pop();
            TeamSlots {
                slots: [first, second],
            }
        }
    };
    (team, skipped)
}
