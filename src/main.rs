// ==========================================
// Club Session Scheduler - binary entry point
// ==========================================
// Bootstraps the database and application state. The operation surface
// lives in the library (api::SessionApi / api::RankingApi); this binary
// prepares a database file so an embedding caller can use it.
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use club_session_scheduler::app::AppState;
use club_session_scheduler::planner::RemotePlannerClient;
use club_session_scheduler::{db, logging, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    info!(app = APP_NAME, version = VERSION, "starting");

    let db_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "club_scheduler.db".to_string());
    let conn = db::open_sqlite_connection(&db_path)
        .with_context(|| format!("opening database at {db_path}"))?;

    match db::read_schema_version(&conn)? {
        Some(version) if version != db::CURRENT_SCHEMA_VERSION => {
            warn!(
                on_disk = version,
                expected = db::CURRENT_SCHEMA_VERSION,
                "schema version mismatch; no automatic migration is performed"
            );
        }
        _ => {}
    }
    db::init_schema(&conn).context("initializing schema")?;

    let endpoint = std::env::var("PLANNER_ENDPOINT").unwrap_or_else(|_| {
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-lite:generateContent"
            .to_string()
    });
    let api_key = std::env::var("PLANNER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("PLANNER_API_KEY is not set; balanced-planner previews will fail");
    }
    let planner = Arc::new(RemotePlannerClient::new(endpoint, api_key));

    let _state = AppState::new(conn, planner);
    info!(db_path, "initialized");

    Ok(())
}
