// ==========================================
// Club Session Scheduler - repository layer
// ==========================================
// SQLite data access. Every repository shares one Arc<Mutex<Connection>>,
// which also serializes regenerate/score/aggregate sequences in-process.
// ==========================================

pub mod club_repo;
pub mod error;
pub mod match_repo;
pub mod ranking_repo;
pub mod session_repo;

pub use club_repo::{ClubRepository, Membership, Season};
pub use error::{RepositoryError, RepositoryResult};
pub use match_repo::MatchRepository;
pub use ranking_repo::RankingRepository;
pub use session_repo::SessionRepository;
