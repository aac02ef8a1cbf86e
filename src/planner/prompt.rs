// ==========================================
// Club Session Scheduler - planner prompt rendering
// ==========================================
// Text prompt for the upstream text-generation model. The response contract
// (JSON only, fixed field names) is spelled out here and enforced again by
// the validator, so a drifting upstream fails closed instead of corrupting
// a plan.
// ==========================================

use std::fmt::Write;

use crate::domain::types::MatchType;
use crate::planner::dto::{MatchPlanRequest, PlannerMode, PlannerParticipant};

pub fn render_prompt(request: &MatchPlanRequest) -> String {
    let mut groups = String::new();
    for (match_type, label) in [
        (MatchType::MensDoubles, "Men's doubles participants"),
        (MatchType::WomensDoubles, "Women's doubles participants"),
        (MatchType::MixedDoubles, "Mixed doubles participants"),
        (MatchType::Singles, "Singles participants"),
    ] {
        let members: Vec<&PlannerParticipant> = request
            .participants
            .iter()
            .filter(|p| p.match_type == match_type)
            .collect();
        if !groups.is_empty() {
            groups.push_str("\n\n");
        }
        groups.push_str(&format_group(label, &members));
    }

    let mode_rules = match request.mode {
        PlannerMode::Balanced => {
            "Matching rules (balanced mode):\n\
             - Keep the total points of the two teams in each match as close as possible\n\
             - Put a high-win-rate player and a low-win-rate player on the same team\n\
             - Minimize the skill gap between the two teams of every match"
        }
        PlannerMode::Random => {
            "Matching rules (random mode):\n\
             - Match players completely at random\n\
             - Ignore skill entirely"
        }
    };

    let config = &request.config;
    format!(
        "Generate match pairings for a racket-club session.\n\
         \n\
         ## Session\n\
         - Start time: {start}\n\
         - End time: {end}\n\
         - Match duration: {match_min} minutes\n\
         - Break duration: {break_min} minutes\n\
         - Courts: {courts}\n\
         \n\
         ## Participants\n\
         {groups}\n\
         \n\
         {mode_rules}\n\
         \n\
         ## Hard rules\n\
         1. Men's doubles players only play men's doubles (4 players per match)\n\
         2. Women's doubles players only play women's doubles (4 players per match)\n\
         3. Mixed doubles players only play mixed doubles (1 man + 1 woman per team)\n\
         4. Singles players only play singles (1 player per team)\n\
         5. Every doubles team has exactly 2 players\n\
         6. Schedule as many matches as fit in the session window\n\
         7. Give players rest between matches where possible\n\
         8. Use the courts efficiently\n\
         \n\
         ## Response format (return JSON only)\n\
         {{\n\
             \"matches\": [\n\
                 {{\n\
                     \"match_number\": 1,\n\
                     \"match_type\": \"singles | mens_doubles | womens_doubles | mixed_doubles\",\n\
                     \"court_number\": 1,\n\
                     \"scheduled_time\": \"HH:MM\",\n\
                     \"team_a\": {{\"player_ids\": [1, 2], \"player_names\": [\"name1\", \"name2\"]}},\n\
                     \"team_b\": {{\"player_ids\": [3, 4], \"player_names\": [\"name3\", \"name4\"]}},\n\
                     \"balance_score\": 0.95\n\
                 }}\n\
             ]\n\
         }}\n\
         \n\
         Return only the JSON, with no other text.",
        start = config.start_time,
        end = config.end_time,
        match_min = config.match_duration_minutes,
        break_min = config.break_duration_minutes,
        courts = config.num_courts,
        groups = groups,
        mode_rules = mode_rules,
    )
}

fn format_group(label: &str, participants: &[&PlannerParticipant]) -> String {
    if participants.is_empty() {
        return format!("{label}: none");
    }
    let mut out = format!("{label} ({}):", participants.len());
    for p in participants {
        let gender = p
            .gender
            .map(|g| g.to_string())
            .unwrap_or_else(|| "unspecified".to_string());
        let _ = write!(
            out,
            "\n  - ID: {}, name: {}, gender: {}, points: {}, wins: {}, losses: {}, win rate: {:.1}%",
            p.id, p.name, gender, p.ranking.points, p.ranking.wins, p.ranking.losses, p.ranking.win_rate
        );
    }
    out
}
