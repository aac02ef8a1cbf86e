// ==========================================
// Club Session Scheduler - match repository
// ==========================================
// Persisted matches, their team lineups, and recorded results. Regeneration
// replaces a session's whole match set inside one transaction so a failed
// write never leaves a half-replaced schedule behind.
// ==========================================

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::domain::matches::{derive_winner, Match, MatchParticipant, MatchResult, PlannedMatch};
use crate::domain::ranking::RankingScope;
use crate::domain::session::ParticipantRef;
use crate::domain::types::{Gender, MatchStatus, MatchType, Team};
use crate::engine::ranking::CompletedMatch;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// MatchRepository
// ==========================================
pub struct MatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MatchRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Delete every match of the session (participants and results cascade
    /// via explicit deletes, not FK cascade, so the statement order is
    /// visible here) and insert the new plan. All or nothing.
    pub fn replace_session_matches(
        &self,
        session_id: i64,
        planned: &[PlannedMatch],
    ) -> RepositoryResult<Vec<i64>> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM match_results
             WHERE match_id IN (SELECT id FROM matches WHERE session_id = ?1)",
            params![session_id],
        )?;
        tx.execute(
            "DELETE FROM match_participants
             WHERE match_id IN (SELECT id FROM matches WHERE session_id = ?1)",
            params![session_id],
        )?;
        tx.execute(
            "DELETE FROM matches WHERE session_id = ?1",
            params![session_id],
        )?;

        let mut match_ids = Vec::with_capacity(planned.len());
        for plan in planned {
            let match_id = insert_planned_match(&tx, session_id, plan)?;
            match_ids.push(match_id);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(match_ids)
    }

    pub fn find_by_id(&self, match_id: i64) -> RepositoryResult<Option<Match>> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"SELECT id, session_id, match_number, court_number, match_type,
                      status, scheduled_at
               FROM matches
               WHERE id = ?1"#,
            params![match_id],
            map_match,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn list_by_session(&self, session_id: i64) -> RepositoryResult<Vec<Match>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, session_id, match_number, court_number, match_type,
                      status, scheduled_at
               FROM matches
               WHERE session_id = ?1
               ORDER BY match_number"#,
        )?;
        let rows = stmt.query_map(params![session_id], map_match)?;
        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        Ok(matches)
    }

    pub fn participants_of(&self, match_id: i64) -> RepositoryResult<Vec<MatchParticipant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT mp.id, mp.match_id, mp.team, mp.position,
                      mp.club_member_id, cu.name, cm.gender,
                      mp.guest_id, g.name, g.gender,
                      mp.user_id, u.name, u.gender
               FROM match_participants mp
               LEFT JOIN club_members cm ON cm.id = mp.club_member_id
               LEFT JOIN users cu ON cu.id = cm.user_id
               LEFT JOIN guests g ON g.id = mp.guest_id
               LEFT JOIN users u ON u.id = mp.user_id
               WHERE mp.match_id = ?1
               ORDER BY mp.team, mp.position"#,
        )?;
        let rows = stmt.query_map(params![match_id], map_match_participant)?;
        let mut participants = Vec::new();
        for row in rows {
            participants.push(row??);
        }
        Ok(participants)
    }

    /// Record (or overwrite) the score of a match and mark it completed.
    /// Winner derivation happens here so the stored row can never disagree
    /// with the scores.
    pub fn record_score(
        &self,
        match_id: i64,
        team_a_score: i32,
        team_b_score: i32,
    ) -> RepositoryResult<MatchResult> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM matches WHERE id = ?1",
                params![match_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "Match".to_string(),
                id: match_id.to_string(),
            });
        }

        let winner = derive_winner(team_a_score, team_b_score);
        let recorded_at = Utc::now();

        tx.execute(
            r#"INSERT INTO match_results (match_id, team_a_score, team_b_score, winner_team, recorded_at)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(match_id) DO UPDATE SET
                   team_a_score = excluded.team_a_score,
                   team_b_score = excluded.team_b_score,
                   winner_team = excluded.winner_team,
                   recorded_at = excluded.recorded_at"#,
            params![
                match_id,
                team_a_score,
                team_b_score,
                winner.map(|t| t.to_string()),
                recorded_at.to_rfc3339(),
            ],
        )?;
        tx.execute(
            "UPDATE matches SET status = ?1 WHERE id = ?2",
            params![MatchStatus::Completed.to_string(), match_id],
        )?;

        let result = tx.query_row(
            r#"SELECT id, match_id, team_a_score, team_b_score, winner_team, recorded_at
               FROM match_results
               WHERE match_id = ?1"#,
            params![match_id],
            map_match_result,
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(result)
    }

    pub fn find_result(&self, match_id: i64) -> RepositoryResult<Option<MatchResult>> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"SELECT id, match_id, team_a_score, team_b_score, winner_team, recorded_at
               FROM match_results
               WHERE match_id = ?1"#,
            params![match_id],
            map_match_result,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Completed matches of a scope reduced to member-id teams, ready for
    /// tally aggregation. Guest and associate slots are dropped here.
    pub fn completed_member_results(
        &self,
        scope: RankingScope,
    ) -> RepositoryResult<Vec<CompletedMatch>> {
        let conn = self.get_conn()?;

        let (filter, season_id) = match scope {
            RankingScope::Club { .. } => ("", None),
            RankingScope::Season { season_id, .. } => (" AND s.season_id = ?2", Some(season_id)),
        };

        let match_sql = format!(
            r#"SELECT m.id, r.winner_team
               FROM matches m
               JOIN sessions s ON s.id = m.session_id
               JOIN match_results r ON r.match_id = m.id
               WHERE s.club_id = ?1{filter}
               ORDER BY m.id"#
        );
        let mut stmt = conn.prepare(&match_sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(i64, Option<String>)> {
            Ok((row.get(0)?, row.get(1)?))
        };
        let match_rows: Vec<(i64, Option<String>)> = match season_id {
            Some(sid) => stmt
                .query_map(params![scope.club_id(), sid], map_row)?
                .collect::<Result<_, _>>()?,
            None => stmt
                .query_map(params![scope.club_id()], map_row)?
                .collect::<Result<_, _>>()?,
        };

        let participant_sql = format!(
            r#"SELECT mp.match_id, mp.club_member_id, mp.team
               FROM match_participants mp
               JOIN matches m ON m.id = mp.match_id
               JOIN match_results r ON r.match_id = m.id
               JOIN sessions s ON s.id = m.session_id
               WHERE s.club_id = ?1{filter} AND mp.club_member_id IS NOT NULL"#
        );
        let mut stmt = conn.prepare(&participant_sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(i64, i64, String)> {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        };
        let participant_rows: Vec<(i64, i64, String)> = match season_id {
            Some(sid) => stmt
                .query_map(params![scope.club_id(), sid], map_row)?
                .collect::<Result<_, _>>()?,
            None => stmt
                .query_map(params![scope.club_id()], map_row)?
                .collect::<Result<_, _>>()?,
        };

        let mut by_match: HashMap<i64, (Vec<i64>, Vec<i64>)> = HashMap::new();
        for (match_id, member_id, team) in participant_rows {
            let entry = by_match.entry(match_id).or_default();
            match Team::from_str(&team) {
                Ok(Team::A) => entry.0.push(member_id),
                Ok(Team::B) => entry.1.push(member_id),
                Err(_) => {
                    return Err(RepositoryError::FieldValueError {
                        field: "team".to_string(),
                        message: format!("unrecognized team label '{team}'"),
                    })
                }
            }
        }

        let mut results = Vec::with_capacity(match_rows.len());
        for (match_id, winner) in match_rows {
            let (team_a_member_ids, team_b_member_ids) =
                by_match.remove(&match_id).unwrap_or_default();
            results.push(CompletedMatch {
                match_id,
                team_a_member_ids,
                team_b_member_ids,
                winner_team: winner.and_then(|w| Team::from_str(&w).ok()),
            });
        }
        Ok(results)
    }
}

fn insert_planned_match(
    tx: &Transaction<'_>,
    session_id: i64,
    plan: &PlannedMatch,
) -> RepositoryResult<i64> {
    tx.execute(
        r#"INSERT INTO matches
           (session_id, match_number, court_number, match_type, status, scheduled_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        params![
            session_id,
            plan.match_number,
            plan.court_number,
            plan.match_type.to_string(),
            MatchStatus::Scheduled.to_string(),
            plan.scheduled_at.to_rfc3339(),
        ],
    )?;
    let match_id = tx.last_insert_rowid();

    for (team, slots) in [(Team::A, &plan.team_a), (Team::B, &plan.team_b)] {
        for (idx, player) in slots.players().enumerate() {
            insert_match_participant(tx, match_id, player, team, (idx + 1) as u8)?;
        }
    }
    Ok(match_id)
}

fn insert_match_participant(
    tx: &Transaction<'_>,
    match_id: i64,
    player: &ParticipantRef,
    team: Team,
    position: u8,
) -> RepositoryResult<()> {
    let (member_id, guest_id, user_id) = match player {
        ParticipantRef::Member { club_member_id, .. } => (Some(*club_member_id), None, None),
        ParticipantRef::Guest { guest_id, .. } => (None, Some(*guest_id), None),
        ParticipantRef::Associate { user_id, .. } => (None, None, Some(*user_id)),
    };
    tx.execute(
        r#"INSERT INTO match_participants
           (match_id, club_member_id, guest_id, user_id, category, team, position)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        params![
            match_id,
            member_id,
            guest_id,
            user_id,
            player.category().to_string(),
            team.to_string(),
            position,
        ],
    )?;
    Ok(())
}

fn map_match(row: &rusqlite::Row<'_>) -> rusqlite::Result<Match> {
    let match_type: String = row.get(4)?;
    let status: String = row.get(5)?;
    let scheduled_at: String = row.get(6)?;
    Ok(Match {
        id: row.get(0)?,
        session_id: row.get(1)?,
        match_number: row.get(2)?,
        court_number: row.get(3)?,
        match_type: MatchType::from_str(&match_type)
            .map_err(|_| rusqlite::Error::InvalidQuery)?,
        status: MatchStatus::from_str(&status).unwrap_or(MatchStatus::Scheduled),
        scheduled_at: parse_stored_instant(&scheduled_at)
            .ok_or(rusqlite::Error::InvalidQuery)?,
    })
}

fn map_match_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<MatchResult> {
    let winner: Option<String> = row.get(4)?;
    let recorded_at: String = row.get(5)?;
    Ok(MatchResult {
        id: row.get(0)?,
        match_id: row.get(1)?,
        team_a_score: row.get(2)?,
        team_b_score: row.get(3)?,
        winner_team: winner.and_then(|w| Team::from_str(&w).ok()),
        recorded_at: parse_stored_instant(&recorded_at).ok_or(rusqlite::Error::InvalidQuery)?,
    })
}

type MatchParticipantRow = rusqlite::Result<RepositoryResult<MatchParticipant>>;

fn map_match_participant(row: &rusqlite::Row<'_>) -> MatchParticipantRow {
    let id: i64 = row.get(0)?;
    let match_id: i64 = row.get(1)?;
    let team: String = row.get(2)?;
    let position: u8 = row.get(3)?;

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
            "match participant {id} must reference exactly one of member/guest/associate"
        ))),
    };

    Ok(participant.map(|participant| {
        let team = Team::from_str(&team).unwrap_or(Team::A);
        MatchParticipant {
            id,
            match_id,
            participant,
            team,
            position,
        }
    }))
}

fn parse_stored_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
