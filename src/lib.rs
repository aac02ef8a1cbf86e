// ==========================================
// Club Session Scheduler - library root
// ==========================================
// Session scheduling and match generation for a racket club: time-slot
// planning, roster classification, round-robin pairing, an external
// balanced-planner contract, match persistence and ranking aggregation.
// ==========================================

pub mod api;
pub mod app;
pub mod db;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod planner;
pub mod repository;
pub mod tz;

pub const APP_NAME: &str = "club-session-scheduler";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "club-session-scheduler");
    }
}
