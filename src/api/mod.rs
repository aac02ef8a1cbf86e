// ==========================================
// Club Session Scheduler - API layer
// ==========================================
// Operation surface over the engine, planner and repositories. Every
// mutating operation checks the caller's manager standing first.
// ==========================================

pub mod dto;
pub mod error;
pub mod ranking_api;
pub mod session_api;

pub use error::{ApiError, ApiResult};
pub use ranking_api::RankingApi;
pub use session_api::SessionApi;
