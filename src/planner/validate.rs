// ==========================================
// Club Session Scheduler - proposal validation
// ==========================================
// Turns the untrusted upstream JSON into a typed proposal. Fail-closed: any
// malformed match rejects the whole proposal rather than silently dropping
// or repairing entries. The summary is always recomputed locally.
// ==========================================

use std::collections::HashSet;
use std::str::FromStr;

use crate::domain::types::MatchType;
use crate::planner::dto::{
    PlanProposal, PlanSummary, ProposedMatch, ProposedTeam, RawMatch, RawProposal,
    SessionPlanConfig,
};
use crate::planner::error::{PlannerError, PlannerResult};
use crate::tz;

pub fn validate_proposal(
    raw: RawProposal,
    config: &SessionPlanConfig,
) -> PlannerResult<PlanProposal> {
    if raw.matches.is_empty() {
        return Err(PlannerError::BadResponse(
            "proposal contains no matches".to_string(),
        ));
    }

    let mut matches = Vec::with_capacity(raw.matches.len());
    for raw_match in raw.matches {
        matches.push(validate_match(raw_match, config)?);
    }

    let summary = PlanSummary::from_matches(&matches);
    Ok(PlanProposal { matches, summary })
}

fn validate_match(raw: RawMatch, config: &SessionPlanConfig) -> PlannerResult<ProposedMatch> {
    let number = raw.match_number;

    let match_type = MatchType::from_str(&raw.match_type).map_err(|_| {
        PlannerError::BadResponse(format!(
            "match {number}: unknown match type '{}'",
            raw.match_type
        ))
    })?;

    if raw.court_number < 1 || raw.court_number > config.num_courts {
        return Err(PlannerError::BadResponse(format!(
            "match {number}: court {} outside 1..={}",
            raw.court_number, config.num_courts
        )));
    }

    if tz::parse_clock_time(&raw.scheduled_time).is_none() {
        return Err(PlannerError::BadResponse(format!(
            "match {number}: scheduled time '{}' is not HH:MM",
            raw.scheduled_time
        )));
    }

    let size = match_type.team_size();
    for (label, team) in [("team_a", &raw.team_a), ("team_b", &raw.team_b)] {
        if team.player_ids.len() != size {
            return Err(PlannerError::BadResponse(format!(
                "match {number}: {label} has {} players, {} expects {size}",
                team.player_ids.len(),
                match_type
            )));
        }
    }

    let mut seen = HashSet::new();
    for id in raw
        .team_a
        .player_ids
        .iter()
        .chain(raw.team_b.player_ids.iter())
    {
        if !seen.insert(*id) {
            return Err(PlannerError::BadResponse(format!(
                "match {number}: player {id} appears twice"
            )));
        }
    }

    Ok(ProposedMatch {
        match_number: number,
        match_type,
        court_number: raw.court_number,
        scheduled_time: raw.scheduled_time,
        team_a: ProposedTeam {
            player_ids: raw.team_a.player_ids,
            player_names: raw.team_a.player_names,
        },
        team_b: ProposedTeam {
            player_ids: raw.team_b.player_ids,
            player_names: raw.team_b.player_names,
        },
        balance_score: raw.balance_score,
    })
}
