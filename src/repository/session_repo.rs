// ==========================================
// Club Session Scheduler - session repository
// ==========================================
// Sessions and their rosters. Roster rows carry exactly one of three
// participant references; this module maps them into the ParticipantRef
// tagged union and rejects rows that violate the invariant.
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::domain::session::{ParticipantRef, Session, SessionParticipant};
use crate::domain::types::{Gender, MatchType, SessionStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// SessionRepository
// ==========================================
pub struct SessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Create a session. Returns the new row id.
    pub fn create(&self, session: &Session) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO sessions (
                club_id, season_id, session_date, start_time, end_time,
                num_courts, match_duration_minutes, break_duration_minutes,
                warmup_duration_minutes, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                session.club_id,
                session.season_id,
                session.session_date.format("%Y-%m-%d").to_string(),
                session.start_time.format("%H:%M:%S").to_string(),
                session.end_time.format("%H:%M:%S").to_string(),
                session.num_courts,
                session.match_duration_minutes,
                session.break_duration_minutes,
                session.warmup_duration_minutes,
                session.status.to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, session_id: i64) -> RepositoryResult<Option<Session>> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"SELECT id, club_id, season_id, session_date, start_time, end_time,
                      num_courts, match_duration_minutes, break_duration_minutes,
                      warmup_duration_minutes, status
               FROM sessions
               WHERE id = ?1"#,
            params![session_id],
            map_session,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn update_status(&self, session_id: i64, status: SessionStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE sessions SET status = ?1 WHERE id = ?2",
            params![status.to_string(), session_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Session".to_string(),
                id: session_id.to_string(),
            });
        }
        Ok(())
    }

    /// The session's current roster with names and genders resolved through
    /// the three reference tables in one batch query (no per-row loads).
    pub fn find_roster(&self, session_id: i64) -> RepositoryResult<Vec<SessionParticipant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT sp.id, sp.session_id, sp.category, sp.participation_type,
                      sp.club_member_id, cu.name, cm.gender,
                      sp.guest_id, g.name, g.gender,
                      sp.user_id, u.name, u.gender
               FROM session_participants sp
               LEFT JOIN club_members cm ON cm.id = sp.club_member_id
               LEFT JOIN users cu ON cu.id = cm.user_id
               LEFT JOIN guests g ON g.id = sp.guest_id
               LEFT JOIN users u ON u.id = sp.user_id
               WHERE sp.session_id = ?1
               ORDER BY sp.id"#,
        )?;

        let rows = stmt.query_map(params![session_id], map_roster_row)?;
        let mut roster = Vec::new();
        for row in rows {
            roster.push(row??);
        }
        Ok(roster)
    }

    /// Add a club member to the roster. The duplicate-join guard mirrors
    /// what the membership UI enforces.
    pub fn add_member_participant(
        &self,
        session_id: i64,
        club_member_id: i64,
        participation_type: Option<MatchType>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM session_participants
                 WHERE session_id = ?1 AND club_member_id = ?2",
                params![session_id, club_member_id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "member {club_member_id} already joined session {session_id}"
            )));
        }

        conn.execute(
            r#"INSERT INTO session_participants
               (session_id, club_member_id, category, participation_type)
               VALUES (?1, ?2, 'member', ?3)"#,
            params![
                session_id,
                club_member_id,
                participation_type.map(|t| t.to_string())
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_guest_participant(
        &self,
        session_id: i64,
        guest_id: i64,
        participation_type: Option<MatchType>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO session_participants
               (session_id, guest_id, category, participation_type)
               VALUES (?1, ?2, 'guest', ?3)"#,
            params![
                session_id,
                guest_id,
                participation_type.map(|t| t.to_string())
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_associate_participant(
        &self,
        session_id: i64,
        user_id: i64,
        participation_type: Option<MatchType>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO session_participants
               (session_id, user_id, category, participation_type)
               VALUES (?1, ?2, 'associate', ?3)"#,
            params![
                session_id,
                user_id,
                participation_type.map(|t| t.to_string())
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn map_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    let date: String = row.get(3)?;
    let start: String = row.get(4)?;
    let end: String = row.get(5)?;
    let status: String = row.get(10)?;
    Ok(Session {
        id: row.get(0)?,
        club_id: row.get(1)?,
        season_id: row.get(2)?,
        session_date: date.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
        start_time: parse_stored_time(&start).ok_or(rusqlite::Error::InvalidQuery)?,
        end_time: parse_stored_time(&end).ok_or(rusqlite::Error::InvalidQuery)?,
        num_courts: row.get(6)?,
        match_duration_minutes: row.get(7)?,
        break_duration_minutes: row.get(8)?,
        warmup_duration_minutes: row.get(9)?,
        status: SessionStatus::from_str(&status).unwrap_or(SessionStatus::Draft),
    })
}

fn parse_stored_time(s: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| chrono::NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

type RosterRow = rusqlite::Result<RepositoryResult<SessionParticipant>>;

fn map_roster_row(row: &rusqlite::Row<'_>) -> RosterRow {
    let id: i64 = row.get(0)?;
    let session_id: i64 = row.get(1)?;
    let _category: String = row.get(2)?;
    let participation_type: Option<String> = row.get(3)?;

    let club_member_id: Option<i64> = row.get(4)?;
    let member_name: Option<String> = row.get(5)?;
    let member_gender: Option<String> = row.get(6)?;
    let guest_id: Option<i64> = row.get(7)?;
    let guest_name: Option<String> = row.get(8)?;
    let guest_gender: Option<String> = row.get(9)?;
    let user_id: Option<i64> = row.get(10)?;
    let user_name: Option<String> = row.get(11)?;
    let user_gender: Option<String> = row.get(12)?;

    let participant = match (club_member_id, guest_id, user_id) {
        (Some(member_id), None, None) => Ok(ParticipantRef::Member {
            club_member_id: member_id,
            name: member_name.unwrap_or_else(|| "Unknown".to_string()),
            gender: member_gender
                .and_then(|g| Gender::from_str(&g).ok())
                .unwrap_or(Gender::Male),
        }),
        (None, Some(gid), None) => Ok(ParticipantRef::Guest {
            guest_id: gid,
            name: guest_name.unwrap_or_else(|| "Unknown".to_string()),
            gender: guest_gender
                .and_then(|g| Gender::from_str(&g).ok())
                .unwrap_or(Gender::Male),
        }),
        (None, None, Some(uid)) => Ok(ParticipantRef::Associate {
            user_id: uid,
            name: user_name.unwrap_or_else(|| "Unknown".to_string()),
            gender: user_gender.and_then(|g| Gender::from_str(&g).ok()),
        }),
        _ => Err(RepositoryError::ValidationError(format!(
            "session participant {id} must reference exactly one of member/guest/associate"
        ))),
    };

    Ok(participant.map(|participant| SessionParticipant {
        id,
        session_id,
        participant,
        participation_type: participation_type.and_then(|t| MatchType::from_str(&t).ok()),
    }))
}
