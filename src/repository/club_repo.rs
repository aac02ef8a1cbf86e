// ==========================================
// Club Session Scheduler - club & membership repository
// ==========================================
// Narrow read interface consumed by the scheduling core: club existence,
// the manager-permission gate, and member id sets for ranking scopes.
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::domain::types::{Gender, MemberRole, MemberStatus, SeasonStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// Membership - one club_members row
// ==========================================
#[derive(Debug, Clone)]
pub struct Membership {
    pub id: i64,
    pub club_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub gender: Gender,
}

impl Membership {
    pub fn is_active_manager(&self) -> bool {
        self.status == MemberStatus::Active && self.role == MemberRole::Manager
    }
}

// ==========================================
// Season - the club+season ranking scope row
// ==========================================
#[derive(Debug, Clone)]
pub struct Season {
    pub id: i64,
    pub club_id: i64,
    pub name: String,
    pub status: SeasonStatus,
}

// ==========================================
// ClubRepository
// ==========================================
pub struct ClubRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClubRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Whether the club exists.
    pub fn club_exists(&self, club_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT id FROM clubs WHERE id = ?1",
                params![club_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Look up the caller's membership in a club.
    pub fn find_membership(
        &self,
        club_id: i64,
        user_id: i64,
    ) -> RepositoryResult<Option<Membership>> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"SELECT id, club_id, user_id, role, status, gender
               FROM club_members
               WHERE club_id = ?1 AND user_id = ?2"#,
            params![club_id, user_id],
            map_membership,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Find a season and verify it belongs to the club.
    pub fn find_season(&self, club_id: i64, season_id: i64) -> RepositoryResult<Option<Season>> {
        let conn = self.get_conn()?;
        conn.query_row(
            r#"SELECT id, club_id, name, status
               FROM seasons
               WHERE id = ?1 AND club_id = ?2"#,
            params![season_id, club_id],
            |row| {
                let status: String = row.get(3)?;
                Ok(Season {
                    id: row.get(0)?,
                    club_id: row.get(1)?,
                    name: row.get(2)?,
                    status: SeasonStatus::from_str(&status).unwrap_or(SeasonStatus::Upcoming),
                })
            },
        )
        .optional()
        .map_err(Into::into)
    }
}

fn map_membership(row: &rusqlite::Row<'_>) -> rusqlite::Result<Membership> {
    let role: String = row.get(3)?;
    let status: String = row.get(4)?;
    let gender: String = row.get(5)?;
    Ok(Membership {
        id: row.get(0)?,
        club_id: row.get(1)?,
        user_id: row.get(2)?,
        role: MemberRole::from_str(&role).unwrap_or(MemberRole::Member),
        status: MemberStatus::from_str(&status).unwrap_or(MemberStatus::Inactive),
        gender: Gender::from_str(&gender).unwrap_or(Gender::Male),
    })
}
