// ==========================================
// Club Session Scheduler - application state
// ==========================================
// Wires the shared connection, repositories and APIs together. Everything
// hangs off one Arc<Mutex<Connection>>, which also serializes the
// delete-then-recreate sequences of concurrent in-process calls.
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{RankingApi, SessionApi};
use crate::planner::BalancedMatchPlanner;
use crate::repository::{ClubRepository, MatchRepository, RankingRepository, SessionRepository};

pub struct AppState {
    pub session_api: Arc<SessionApi>,
    pub ranking_api: Arc<RankingApi>,
}

impl AppState {
    pub fn new(conn: Connection, planner: Arc<dyn BalancedMatchPlanner>) -> Self {
        let conn = Arc::new(Mutex::new(conn));

        let clubs = Arc::new(ClubRepository::new(conn.clone()));
        let sessions = Arc::new(SessionRepository::new(conn.clone()));
        let matches = Arc::new(MatchRepository::new(conn.clone()));
        let rankings = Arc::new(RankingRepository::new(conn));

        let session_api = Arc::new(SessionApi::new(
            clubs.clone(),
            sessions,
            matches.clone(),
            rankings.clone(),
            planner,
        ));
        let ranking_api = Arc::new(RankingApi::new(clubs, matches, rankings));

        Self {
            session_api,
            ranking_api,
        }
    }
}
