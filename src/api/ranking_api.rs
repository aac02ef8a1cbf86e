// ==========================================
// Club Session Scheduler - ranking API
// ==========================================
// On-demand recomputation of club and season rankings. Each run re-reads
// the scope's full completed-match history and overwrites the stored rows.
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::dto::{ClubRankingUpdateResponse, SeasonRankingUpdateResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::ranking::RankingScope;
use crate::engine::aggregate_results;
use crate::repository::{ClubRepository, MatchRepository, RankingRepository};

// ==========================================
// RankingApi
// ==========================================
pub struct RankingApi {
    clubs: Arc<ClubRepository>,
    matches: Arc<MatchRepository>,
    rankings: Arc<RankingRepository>,
}

impl RankingApi {
    pub fn new(
        clubs: Arc<ClubRepository>,
        matches: Arc<MatchRepository>,
        rankings: Arc<RankingRepository>,
    ) -> Self {
        Self {
            clubs,
            matches,
            rankings,
        }
    }

    /// Recompute club-wide rankings from every completed match.
    pub fn update_club_rankings(
        &self,
        club_id: i64,
        actor_user_id: i64,
    ) -> ApiResult<ClubRankingUpdateResponse> {
        if !self.clubs.club_exists(club_id)? {
            return Err(ApiError::NotFound(format!("Club with id={club_id}")));
        }
        self.require_manager(club_id, actor_user_id)?;

        let scope = RankingScope::Club { club_id };
        let updated_members = self.recompute(scope)?;
        info!(club_id, updated_members, "club rankings recomputed");

        Ok(ClubRankingUpdateResponse {
            message: format!("rankings updated for {updated_members} members"),
            updated_members,
        })
    }

    /// Recompute one season's rankings. The season must belong to the club.
    pub fn calculate_season_rankings(
        &self,
        club_id: i64,
        season_id: i64,
        actor_user_id: i64,
    ) -> ApiResult<SeasonRankingUpdateResponse> {
        let season = self
            .clubs
            .find_season(club_id, season_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Season with id={season_id}")))?;
        self.require_manager(club_id, actor_user_id)?;

        let scope = RankingScope::Season { club_id, season_id };
        let total_members = self.recompute(scope)?;
        info!(
            club_id,
            season_id,
            season = %season.name,
            total_members,
            "season rankings recomputed"
        );

        Ok(SeasonRankingUpdateResponse {
            message: format!("season rankings calculated for {total_members} members"),
            total_members,
        })
    }

    fn recompute(&self, scope: RankingScope) -> ApiResult<usize> {
        let completed = self.matches.completed_member_results(scope)?;
        let tallies = aggregate_results(&completed);
        Ok(self.rankings.upsert_rankings(scope, &tallies)?)
    }

    fn require_manager(&self, club_id: i64, user_id: i64) -> ApiResult<()> {
        let membership = self
            .clubs
            .find_membership(club_id, user_id)?
            .ok_or_else(|| {
                ApiError::PermissionDenied(format!("user {user_id} is not a member of club {club_id}"))
            })?;
        if !membership.is_active_manager() {
            return Err(ApiError::PermissionDenied(format!(
                "user {user_id} is not an active manager of club {club_id}"
            )));
        }
        Ok(())
    }
}
