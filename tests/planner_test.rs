// ==========================================
// Planner preview/confirm integration tests
// ==========================================


use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use club_session_scheduler::api::dto::{AiPreviewRequest, ConfirmMatch, ConfirmMatchesRequest, ConfirmTeam};
use club_session_scheduler::api::ApiError;
use club_session_scheduler::domain::types::MatchType;
use club_session_scheduler::planner::dto::{
    PlanProposal, PlanSummary, ProposedMatch, ProposedTeam,
};
use club_session_scheduler::tz;
use test_helpers::{StubPlanner, TestApp};

fn proposal_with(matches: Vec<ProposedMatch>) -> PlanProposal {
    let summary = PlanSummary::from_matches(&matches);
    PlanProposal { matches, summary }
}

fn proposed(ids_a: Vec<i64>, ids_b: Vec<i64>) -> ProposedMatch {
    ProposedMatch {
        match_number: 1,
        match_type: MatchType::MixedDoubles,
        court_number: 1,
        scheduled_time: "19:10".to_string(),
        team_a: ProposedTeam {
            player_ids: ids_a,
            player_names: vec![],
        },
        team_b: ProposedTeam {
            player_ids: ids_b,
            player_names: vec![],
        },
        balance_score: Some(0.9),
    }
}

fn preview_request(mode: &str) -> AiPreviewRequest {
    AiPreviewRequest {
        mode: mode.to_string(),
        match_duration_minutes: None,
        break_duration_minutes: None,
    }
}

/// Session with a 2-male + 2-female mixed roster; returns
/// (session_id, manager_user_id, session-participant ids).
fn mixed_roster(app: &TestApp) -> (i64, i64, Vec<i64>) {
    let club_id = app.seed_club("Planner Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);

    let mut participant_ids = Vec::new();
    for (name, gender) in [
        ("m-1", "male"),
        ("m-2", "male"),
        ("f-1", "female"),
        ("f-2", "female"),
    ] {
        let (member_id, _) = app.seed_member(club_id, name, gender);
        participant_ids.push(app.join_member(session_id, member_id, Some("mixed_doubles")));
    }
    (session_id, manager, participant_ids)
}

#[tokio::test]
async fn test_preview_returns_plan_without_persisting() {
    let app = TestApp::with_planner(Arc::new(StubPlanner::Propose(proposal_with(vec![
        proposed(vec![1, 3], vec![2, 4]),
    ]))));
    let (session_id, manager, _) = mixed_roster(&app);

    let response = app
        .session_api
        .generate_ai_preview(session_id, manager, &preview_request("balanced"))
        .await
        .unwrap();

    assert!(response.preview);
    assert_eq!(response.mode, "balanced");
    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.summary.total_matches, 1);
    assert_eq!(response.summary.mixed_doubles_matches, 1);
    assert_eq!(response.session_config.start_time, "19:00");
    assert_eq!(response.session_config.num_courts, 2);

    // preview persisted nothing
    assert!(app.matches.list_by_session(session_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_duration_overrides_apply() {
    let app = TestApp::with_planner(Arc::new(StubPlanner::Propose(proposal_with(vec![
        proposed(vec![1, 3], vec![2, 4]),
    ]))));
    let (session_id, manager, _) = mixed_roster(&app);

    let response = app
        .session_api
        .generate_ai_preview(
            session_id,
            manager,
            &AiPreviewRequest {
                mode: "random".to_string(),
                match_duration_minutes: Some(20),
                break_duration_minutes: Some(0),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.session_config.match_duration_minutes, 20);
    assert_eq!(response.session_config.break_duration_minutes, 0);
}

#[tokio::test]
async fn test_preview_roster_below_minimum_rejected() {
    let app = TestApp::new();
    let club_id = app.seed_club("Small Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);
    let (member_id, _) = app.seed_member(club_id, "only-one", "male");
    app.join_member(session_id, member_id, None);

    let err = app
        .session_api
        .generate_ai_preview(session_id, manager, &preview_request("balanced"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_preview_unknown_mode_rejected() {
    let app = TestApp::new();
    let (session_id, manager, _) = mixed_roster(&app);

    let err = app
        .session_api
        .generate_ai_preview(session_id, manager, &preview_request("psychic"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_planner_outage_maps_to_upstream_unavailable() {
    let app = TestApp::with_planner(Arc::new(StubPlanner::Unavailable));
    let (session_id, manager, _) = mixed_roster(&app);

    let err = app
        .session_api
        .generate_ai_preview(session_id, manager, &preview_request("balanced"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UpstreamUnavailable(_)));
    assert!(app.matches.list_by_session(session_id).unwrap().is_empty());
}

#[test]
fn test_confirm_materializes_plan_with_local_times() {
    let app = TestApp::new();
    let (session_id, manager, sp) = mixed_roster(&app);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "mixed_doubles".to_string(),
            court_number: 2,
            scheduled_time: "19:30".to_string(),
            team_a: ConfirmTeam {
                player_ids: vec![sp[0], sp[2]],
            },
            team_b: ConfirmTeam {
                player_ids: vec![sp[1], sp[3]],
            },
        }],
    };
    let response = app
        .session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap();
    assert_eq!(response.match_ids.len(), 1);

    let matches = app.matches.list_by_session(session_id).unwrap();
    assert_eq!(matches[0].match_type, MatchType::MixedDoubles);
    assert_eq!(matches[0].court_number, 2);

    let date = NaiveDate::from_ymd_opt(2026, 5, 9).unwrap();
    let expected = tz::local_date_time_to_utc(date, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
    assert_eq!(matches[0].scheduled_at, expected);

    let participants = app.matches.participants_of(matches[0].id).unwrap();
    assert_eq!(participants.len(), 4);
}

#[test]
fn test_confirm_skips_unknown_participant_ids() {
    let app = TestApp::new();
    let (session_id, manager, sp) = mixed_roster(&app);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "mixed_doubles".to_string(),
            court_number: 1,
            scheduled_time: "19:10".to_string(),
            team_a: ConfirmTeam {
                // 9999 is on no roster; the slot is skipped, not fatal
                player_ids: vec![sp[0], 9999],
            },
            team_b: ConfirmTeam {
                player_ids: vec![sp[1], sp[3]],
            },
        }],
    };
    let response = app
        .session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap();
    assert_eq!(response.match_ids.len(), 1);

    let participants = app.matches.participants_of(response.match_ids[0]).unwrap();
    assert_eq!(participants.len(), 3);
}

#[test]
fn test_confirm_replaces_previously_generated_matches() {
    let app = TestApp::new();
    let (session_id, manager, sp) = mixed_roster(&app);

    let generated = app.session_api.generate_matches(session_id, manager).unwrap();
    assert_eq!(generated.match_ids.len(), 1);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "mixed_doubles".to_string(),
            court_number: 1,
            scheduled_time: "20:00".to_string(),
            team_a: ConfirmTeam {
                player_ids: vec![sp[0], sp[2]],
            },
            team_b: ConfirmTeam {
                player_ids: vec![sp[1], sp[3]],
            },
        }],
    };
    app.session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap();

    let matches = app.matches.list_by_session(session_id).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(app
        .matches
        .find_by_id(generated.match_ids[0])
        .unwrap()
        .is_none());
}

#[test]
fn test_confirm_rejects_unknown_match_type() {
    let app = TestApp::new();
    let (session_id, manager, sp) = mixed_roster(&app);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "triples".to_string(),
            court_number: 1,
            scheduled_time: "19:10".to_string(),
            team_a: ConfirmTeam {
                player_ids: vec![sp[0]],
            },
            team_b: ConfirmTeam {
                player_ids: vec![sp[1]],
            },
        }],
    };
    let err = app
        .session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_confirm_rejects_court_out_of_range() {
    let app = TestApp::new();
    let (session_id, manager, sp) = mixed_roster(&app);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "mixed_doubles".to_string(),
            court_number: 7,
            scheduled_time: "19:10".to_string(),
            team_a: ConfirmTeam {
                player_ids: vec![sp[0], sp[2]],
            },
            team_b: ConfirmTeam {
                player_ids: vec![sp[1], sp[3]],
            },
        }],
    };
    let err = app
        .session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_confirm_with_no_resolvable_matches_rejected() {
    let app = TestApp::new();
    let (session_id, manager, _) = mixed_roster(&app);

    let request = ConfirmMatchesRequest {
        matches: vec![ConfirmMatch {
            match_number: 1,
            match_type: "mixed_doubles".to_string(),
            court_number: 1,
            scheduled_time: "19:10".to_string(),
            team_a: ConfirmTeam {
                player_ids: vec![9998, 9999],
            },
            team_b: ConfirmTeam {
                player_ids: vec![9996, 9997],
            },
        }],
    };
    let err = app
        .session_api
        .confirm_ai_matches(session_id, manager, &request)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_confirm_empty_request_rejected() {
    let app = TestApp::new();
    let (session_id, manager, _) = mixed_roster(&app);

    let err = app
        .session_api
        .confirm_ai_matches(session_id, manager, &ConfirmMatchesRequest { matches: vec![] })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
