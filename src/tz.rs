// ==========================================
// Club Session Scheduler - timezone normalization
// ==========================================
// Storage is always UTC; sessions and previews speak club-local clock time.
// Clubs run on a single fixed offset (KST, UTC+9), so a FixedOffset is
// enough - no DST handling required.
// ==========================================

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Club-local offset in hours (KST = UTC+9).
pub const CLUB_UTC_OFFSET_HOURS: i32 = 9;

/// The club-local fixed offset.
pub fn club_offset() -> FixedOffset {
    FixedOffset::east_opt(CLUB_UTC_OFFSET_HOURS * 3600)
        .expect("static offset is within bounds")
}

/// Combine a session date with a club-local clock time and normalize to UTC.
pub fn local_date_time_to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let local = date.and_time(time);
    club_offset()
        .from_local_datetime(&local)
        .single()
        .expect("fixed offsets have no ambiguous local times")
        .with_timezone(&Utc)
}

/// Convert a stored UTC instant back to the club-local wall clock.
pub fn utc_to_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&club_offset())
}

/// Parse an `HH:MM` clock-time string (the planner wire format).
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Format a clock time as `HH:MM`.
pub fn format_clock_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}
