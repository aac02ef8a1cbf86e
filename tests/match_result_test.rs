// ==========================================
// Score recording integration tests
// ==========================================


use club_session_scheduler::api::dto::ScoreUpdateRequest;
use club_session_scheduler::api::ApiError;
use club_session_scheduler::domain::types::{MatchStatus, Team};
use test_helpers::TestApp;

struct Fixture {
    club_id: i64,
    session_id: i64,
    match_id: i64,
    manager: i64,
}

/// A session with one generated mens-doubles match.
fn session_with_match(app: &TestApp) -> Fixture {
    let club_id = app.seed_club("Score Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);
    for i in 0..4 {
        let (member_id, _) = app.seed_member(club_id, &format!("p{i}"), "male");
        app.join_member(session_id, member_id, Some("mens_doubles"));
    }
    let response = app.session_api.generate_matches(session_id, manager).unwrap();
    Fixture {
        club_id,
        session_id,
        match_id: response.match_ids[0],
        manager,
    }
}

fn score(a: Option<i32>, b: Option<i32>) -> ScoreUpdateRequest {
    ScoreUpdateRequest {
        team_a_score: a,
        team_b_score: b,
    }
}

#[test]
fn test_higher_score_sets_winner_and_completes_match() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    app.session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(Some(21), Some(15)))
        .unwrap();

    let result = app.matches.find_result(f.match_id).unwrap().unwrap();
    assert_eq!(result.team_a_score, 21);
    assert_eq!(result.team_b_score, 15);
    assert_eq!(result.winner_team, Some(Team::A));

    let stored = app.matches.find_by_id(f.match_id).unwrap().unwrap();
    assert_eq!(stored.status, MatchStatus::Completed);
}

#[test]
fn test_tie_leaves_winner_unset() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    app.session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(Some(15), Some(15)))
        .unwrap();

    let result = app.matches.find_result(f.match_id).unwrap().unwrap();
    assert_eq!(result.winner_team, None);
}

#[test]
fn test_partial_update_merges_with_previous_scores() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    // first write: only team A known, team B defaults to zero
    app.session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(Some(11), None))
        .unwrap();
    let result = app.matches.find_result(f.match_id).unwrap().unwrap();
    assert_eq!((result.team_a_score, result.team_b_score), (11, 0));
    assert_eq!(result.winner_team, Some(Team::A));

    // later edit fills in team B and flips the winner
    app.session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(None, Some(21)))
        .unwrap();
    let result = app.matches.find_result(f.match_id).unwrap().unwrap();
    assert_eq!((result.team_a_score, result.team_b_score), (11, 21));
    assert_eq!(result.winner_team, Some(Team::B));
}

#[test]
fn test_negative_score_rejected_before_write() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    let err = app
        .session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(Some(-1), Some(3)))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(app.matches.find_result(f.match_id).unwrap().is_none());
}

#[test]
fn test_empty_score_update_rejected() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    let err = app
        .session_api
        .update_match_score(f.session_id, f.match_id, f.manager, &score(None, None))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_match_must_belong_to_session() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    let club_id = app.seed_club("Other Club");
    let other_manager = app.seed_manager(club_id, "other-manager");
    let other_session = app.seed_session(club_id, None);

    let err = app
        .session_api
        .update_match_score(other_session, f.match_id, other_manager, &score(Some(1), Some(0)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_non_manager_cannot_record_scores() {
    let app = TestApp::new();
    let f = session_with_match(&app);

    // a plain member of the session's club
    let (_, plain_user) = app.seed_member(f.club_id, "regular", "female");
    let err = app
        .session_api
        .update_match_score(f.session_id, f.match_id, plain_user, &score(Some(2), Some(1)))
        .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied(_)));
}
