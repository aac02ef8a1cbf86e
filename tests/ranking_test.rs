// ==========================================
// Ranking aggregation integration tests
// ==========================================


use chrono::Utc;
use club_session_scheduler::api::dto::ScoreUpdateRequest;
use club_session_scheduler::api::ApiError;
use club_session_scheduler::domain::matches::{PlannedMatch, TeamSlots};
use club_session_scheduler::domain::ranking::RankingScope;
use club_session_scheduler::domain::session::ParticipantRef;
use club_session_scheduler::domain::types::{Gender, MatchType, Team};
use test_helpers::TestApp;

fn member_ref(club_member_id: i64, name: &str) -> ParticipantRef {
    ParticipantRef::Member {
        club_member_id,
        name: name.to_string(),
        gender: Gender::Male,
    }
}

fn record(app: &TestApp, session_id: i64, match_id: i64, manager: i64, a: i32, b: i32) {
    app.session_api
        .update_match_score(
            session_id,
            match_id,
            manager,
            &ScoreUpdateRequest {
                team_a_score: Some(a),
                team_b_score: Some(b),
            },
        )
        .unwrap();
}

#[test]
fn test_club_rankings_from_completed_matches() {
    let app = TestApp::new();
    let club_id = app.seed_club("Ranking Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);
    for i in 0..4 {
        let (member_id, _) = app.seed_member(club_id, &format!("p{i}"), "male");
        app.join_member(session_id, member_id, Some("mens_doubles"));
    }

    let generated = app.session_api.generate_matches(session_id, manager).unwrap();
    let match_id = generated.match_ids[0];
    record(&app, session_id, match_id, manager, 21, 15);

    let response = app.ranking_api.update_club_rankings(club_id, manager).unwrap();
    assert_eq!(response.updated_members, 4);

    let rankings = app
        .rankings
        .list_rankings(RankingScope::Club { club_id })
        .unwrap();
    assert_eq!(rankings.len(), 4);

    // winners first: 3 points each, losers 0
    let winner_ids: Vec<i64> = app
        .matches
        .participants_of(match_id)
        .unwrap()
        .iter()
        .filter(|p| p.team == Team::A)
        .map(|p| p.participant.entity_id())
        .collect();
    for ranking in &rankings {
        let expected = if winner_ids.contains(&ranking.club_member_id) {
            (1, 0, 3)
        } else {
            (0, 1, 0)
        };
        assert_eq!(
            (ranking.wins, ranking.losses, ranking.points),
            expected,
            "member {}",
            ranking.club_member_id
        );
        assert_eq!(ranking.total_matches, 1);
    }
}

#[test]
fn test_guests_are_excluded_from_rankings() {
    let app = TestApp::new();
    let club_id = app.seed_club("Guest Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);

    let (m1, _) = app.seed_member(club_id, "member-1", "male");
    let (m2, _) = app.seed_member(club_id, "member-2", "male");
    let g1 = app.seed_guest(club_id, "guest-1", "male");
    let g2 = app.seed_guest(club_id, "guest-2", "male");

    // one member and one guest per team
    let plan = vec![PlannedMatch {
        match_number: 1,
        court_number: 1,
        match_type: MatchType::MensDoubles,
        scheduled_at: Utc::now(),
        team_a: TeamSlots::doubles(
            member_ref(m1, "member-1"),
            ParticipantRef::Guest {
                guest_id: g1,
                name: "guest-1".to_string(),
                gender: Gender::Male,
            },
        ),
        team_b: TeamSlots::doubles(
            member_ref(m2, "member-2"),
            ParticipantRef::Guest {
                guest_id: g2,
                name: "guest-2".to_string(),
                gender: Gender::Male,
            },
        ),
    }];
    let ids = app.matches.replace_session_matches(session_id, &plan).unwrap();
    record(&app, session_id, ids[0], manager, 10, 5);

    let response = app.ranking_api.update_club_rankings(club_id, manager).unwrap();
    assert_eq!(response.updated_members, 2);

    let rankings = app
        .rankings
        .list_rankings(RankingScope::Club { club_id })
        .unwrap();
    let ranked: Vec<i64> = rankings.iter().map(|r| r.club_member_id).collect();
    assert!(ranked.contains(&m1));
    assert!(ranked.contains(&m2));
    assert_eq!(ranked.len(), 2);
}

#[test]
fn test_recomputation_overwrites_instead_of_merging() {
    let app = TestApp::new();
    let club_id = app.seed_club("Overwrite Club");
    let manager = app.seed_manager(club_id, "manager");
    let session_id = app.seed_session(club_id, None);
    for i in 0..4 {
        let (member_id, _) = app.seed_member(club_id, &format!("p{i}"), "male");
        app.join_member(session_id, member_id, Some("mens_doubles"));
    }
    let generated = app.session_api.generate_matches(session_id, manager).unwrap();
    record(&app, session_id, generated.match_ids[0], manager, 21, 15);

    app.ranking_api.update_club_rankings(club_id, manager).unwrap();
    app.ranking_api.update_club_rankings(club_id, manager).unwrap();

    let rankings = app
        .rankings
        .list_rankings(RankingScope::Club { club_id })
        .unwrap();
    assert_eq!(rankings.len(), 4);
    // a second run over the same history does not double anything
    assert!(rankings.iter().all(|r| r.total_matches == 1));
    assert_eq!(rankings.iter().map(|r| r.points).max(), Some(3));
}

#[test]
fn test_season_rankings_scope_only_season_sessions() {
    let app = TestApp::new();
    let club_id = app.seed_club("Season Club");
    let manager = app.seed_manager(club_id, "manager");
    let season_id = app.seed_season(club_id, "Spring 2026");

    let in_season = app.seed_session(club_id, Some(season_id));
    let off_season = app.seed_session(club_id, None);

    let (m1, _) = app.seed_member(club_id, "m1", "male");
    let (m2, _) = app.seed_member(club_id, "m2", "male");

    for (session_id, score_a) in [(in_season, 11), (off_season, 3)] {
        let plan = vec![PlannedMatch {
            match_number: 1,
            court_number: 1,
            match_type: MatchType::Singles,
            scheduled_at: Utc::now(),
            team_a: TeamSlots::singles(member_ref(m1, "m1")),
            team_b: TeamSlots::singles(member_ref(m2, "m2")),
        }];
        let ids = app.matches.replace_session_matches(session_id, &plan).unwrap();
        record(&app, session_id, ids[0], manager, score_a, 5);
    }

    let response = app
        .ranking_api
        .calculate_season_rankings(club_id, season_id, manager)
        .unwrap();
    assert_eq!(response.total_members, 2);

    let season_rows = app
        .rankings
        .list_rankings(RankingScope::Season { club_id, season_id })
        .unwrap();
    // only the in-season match counts
    assert!(season_rows.iter().all(|r| r.total_matches == 1));
    let top = &season_rows[0];
    assert_eq!(top.club_member_id, m1);
    assert_eq!(top.points, 3);
}

#[test]
fn test_season_of_another_club_not_found() {
    let app = TestApp::new();
    let club_id = app.seed_club("Club A");
    let manager = app.seed_manager(club_id, "manager");
    let other_club = app.seed_club("Club B");
    let foreign_season = app.seed_season(other_club, "Foreign");

    let err = app
        .ranking_api
        .calculate_season_rankings(club_id, foreign_season, manager)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_unknown_club_not_found() {
    let app = TestApp::new();
    let err = app.ranking_api.update_club_rankings(99, 1).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_non_manager_cannot_update_rankings() {
    let app = TestApp::new();
    let club_id = app.seed_club("Gate Club");
    let (_, plain_user) = app.seed_member(club_id, "regular", "female");

    let err = app
        .ranking_api
        .update_club_rankings(club_id, plain_user)
        .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied(_)));
}
