// ==========================================
// Schedule preview integration tests
// ==========================================


use club_session_scheduler::api::dto::{SchedulePreviewRequest, ScheduleSlotKind};
use club_session_scheduler::api::ApiError;
use test_helpers::TestApp;

fn preview_request() -> SchedulePreviewRequest {
    SchedulePreviewRequest {
        start_time: "09:00".to_string(),
        end_time: "12:00".to_string(),
        num_courts: 4,
        match_duration_minutes: 30,
        break_duration_minutes: Some(5),
        warmup_duration_minutes: Some(10),
    }
}

#[test]
fn test_reference_window_preview() {
    let app = TestApp::new();
    let club_id = app.seed_club("Morning Club");
    let session_id = app.seed_session(club_id, None);

    let preview = app
        .session_api
        .schedule_preview(session_id, &preview_request())
        .unwrap();

    assert_eq!(preview.total_duration_minutes, 180);
    assert_eq!(preview.available_minutes, 170);
    assert_eq!(preview.max_rounds, 5);
    assert_eq!(preview.matches_per_round, 4);
    assert_eq!(preview.total_matches, 20);
    assert_eq!(preview.warmup_end_time, "09:10");
    assert_eq!(preview.actual_end_time, "12:00");
    assert!((preview.utilization_percent - 100.0).abs() < 1e-9);

    // warmup slot, then match/break alternation with no break after the last round
    assert_eq!(preview.schedule[0].kind, ScheduleSlotKind::Warmup);
    let match_slots: Vec<_> = preview
        .schedule
        .iter()
        .filter(|s| s.kind == ScheduleSlotKind::Match)
        .collect();
    let break_slots = preview
        .schedule
        .iter()
        .filter(|s| s.kind == ScheduleSlotKind::Break)
        .count();
    assert_eq!(match_slots.len(), 5);
    assert_eq!(break_slots, 4);
    assert_eq!(match_slots[0].start_time, "09:10");
    assert_eq!(match_slots[0].end_time, "09:40");
    assert_eq!(match_slots[0].matches_count, Some(4));
    assert_eq!(match_slots[4].end_time, "12:00");
}

#[test]
fn test_preview_is_reproducible_and_persists_nothing() {
    let app = TestApp::new();
    let club_id = app.seed_club("Club");
    let session_id = app.seed_session(club_id, None);

    let first = app
        .session_api
        .schedule_preview(session_id, &preview_request())
        .unwrap();
    let second = app
        .session_api
        .schedule_preview(session_id, &preview_request())
        .unwrap();
    assert_eq!(first.total_matches, second.total_matches);
    assert_eq!(first.actual_end_time, second.actual_end_time);

    assert!(app.matches.list_by_session(session_id).unwrap().is_empty());
}

#[test]
fn test_preview_unknown_session_rejected() {
    let app = TestApp::new();
    let err = app
        .session_api
        .schedule_preview(4242, &preview_request())
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_preview_invalid_clock_time_rejected() {
    let app = TestApp::new();
    let club_id = app.seed_club("Club");
    let session_id = app.seed_session(club_id, None);

    let mut req = preview_request();
    req.start_time = "nine".to_string();
    let err = app
        .session_api
        .schedule_preview(session_id, &req)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_preview_zero_courts_rejected() {
    let app = TestApp::new();
    let club_id = app.seed_club("Club");
    let session_id = app.seed_session(club_id, None);

    let mut req = preview_request();
    req.num_courts = 0;
    let err = app
        .session_api
        .schedule_preview(session_id, &req)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
