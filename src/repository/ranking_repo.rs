// ==========================================
// Club Session Scheduler - ranking repository
// ==========================================
// Persisted ranking tables for the club and season scopes. Aggregation
// always recomputes from match history, so upserts overwrite rows wholesale
// instead of incrementing them.
// ==========================================

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::ranking::{MemberTally, Ranking, RankingScope, RankingSnapshot};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// RankingRepository
// ==========================================
pub struct RankingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RankingRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Overwrite the scope's ranking rows with freshly aggregated tallies.
    /// One transaction per run; returns the number of members written.
    pub fn upsert_rankings(
        &self,
        scope: RankingScope,
        tallies: &BTreeMap<i64, MemberTally>,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let sql = match scope {
            RankingScope::Club { .. } => {
                r#"INSERT INTO rankings
                   (club_id, club_member_id, total_matches, wins, draws, losses, points, last_updated)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                   ON CONFLICT(club_id, club_member_id) DO UPDATE SET
                       total_matches = excluded.total_matches,
                       wins = excluded.wins,
                       draws = excluded.draws,
                       losses = excluded.losses,
                       points = excluded.points,
                       last_updated = excluded.last_updated"#
            }
            RankingScope::Season { .. } => {
                r#"INSERT INTO season_rankings
                   (season_id, club_member_id, total_matches, wins, draws, losses, points, last_updated)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                   ON CONFLICT(season_id, club_member_id) DO UPDATE SET
                       total_matches = excluded.total_matches,
                       wins = excluded.wins,
                       draws = excluded.draws,
                       losses = excluded.losses,
                       points = excluded.points,
                       last_updated = excluded.last_updated"#
            }
        };
        let scope_id = match scope {
            RankingScope::Club { club_id } => club_id,
            RankingScope::Season { season_id, .. } => season_id,
        };

        for (member_id, tally) in tallies {
            tx.execute(
                sql,
                params![
                    scope_id,
                    member_id,
                    tally.total_matches,
                    tally.wins,
                    tally.draws,
                    tally.losses,
                    tally.points(),
                    now,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(tallies.len())
    }

    /// Scope rankings ordered for display: points, then wins, then fewest
    /// losses.
    pub fn list_rankings(&self, scope: RankingScope) -> RepositoryResult<Vec<Ranking>> {
        let conn = self.get_conn()?;
        let (sql, scope_id) = match scope {
            RankingScope::Club { club_id } => (
                r#"SELECT id, club_member_id, total_matches, wins, draws, losses, points, last_updated
                   FROM rankings
                   WHERE club_id = ?1
                   ORDER BY points DESC, wins DESC, losses ASC, club_member_id"#,
                club_id,
            ),
            RankingScope::Season { season_id, .. } => (
                r#"SELECT id, club_member_id, total_matches, wins, draws, losses, points, last_updated
                   FROM season_rankings
                   WHERE season_id = ?1
                   ORDER BY points DESC, wins DESC, losses ASC, club_member_id"#,
                season_id,
            ),
        };

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![scope_id], |row| {
            let last_updated: String = row.get(7)?;
            Ok(Ranking {
                id: row.get(0)?,
                scope,
                club_member_id: row.get(1)?,
                total_matches: row.get(2)?,
                wins: row.get(3)?,
                draws: row.get(4)?,
                losses: row.get(5)?,
                points: row.get(6)?,
                last_updated: parse_stored_instant(&last_updated)
                    .ok_or(rusqlite::Error::InvalidQuery)?,
            })
        })?;

        let mut rankings = Vec::new();
        for row in rows {
            rankings.push(row?);
        }
        Ok(rankings)
    }

    /// Planner-facing standing of one member within the club scope.
    /// Members with no ranking row yet get the zeroed default.
    pub fn snapshot_for_member(
        &self,
        club_id: i64,
        club_member_id: i64,
    ) -> RepositoryResult<RankingSnapshot> {
        let conn = self.get_conn()?;
        let snapshot = conn
            .query_row(
                r#"SELECT total_matches, wins, draws, losses, points
                   FROM rankings
                   WHERE club_id = ?1 AND club_member_id = ?2"#,
                params![club_id, club_member_id],
                |row| {
                    let total_matches: u32 = row.get(0)?;
                    let wins: u32 = row.get(1)?;
                    let losses: u32 = row.get(3)?;
                    let points: u32 = row.get(4)?;
                    let win_rate = if total_matches == 0 {
                        0.0
                    } else {
                        f64::from(wins) / f64::from(total_matches) * 100.0
                    };
                    Ok(RankingSnapshot {
                        points,
                        wins,
                        losses,
                        win_rate,
                    })
                },
            )
            .optional()?;
        Ok(snapshot.unwrap_or_default())
    }
}

fn parse_stored_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
