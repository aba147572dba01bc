//! MatchHistoryApi trait abstraction for client implementations

use crate::error::ClientResult;
use crate::types::{
    MatchFilters, MatchSummary, Player, PlayerLookup, QueueType, TableBundle, TableData,
};
use async_trait::async_trait;

/// Remote match-history API interface
/// Implemented by both the real HttpRiotClient and MockRiotApi
#[async_trait]
pub trait MatchHistoryApi: Send + Sync {
    /// Resolve a player record. Returns `None` when no player exists for
    /// the given lookup (a normal empty result, not an error).
    async fn get_player(&self, lookup: &PlayerLookup) -> ClientResult<Option<Player>>;

    /// Fetch up to `limit` match summaries for an account, newest first,
    /// restricted by `filters`. An unknown account or an empty history
    /// yields an empty list.
    async fn get_match_history(
        &self,
        account_id: &str,
        filters: &MatchFilters,
        limit: u32,
    ) -> ClientResult<Vec<MatchSummary>>;

    /// Fetch the detail bundle for one match: metadata, team, ban,
    /// participant and stat tables keyed by the match identifier.
    async fn get_match_details(&self, game_id: i64) -> ClientResult<TableBundle>;

    /// Fetch the timeline bundle for one match: frame and event tables.
    async fn get_timeline(&self, game_id: i64) -> ClientResult<TableBundle>;

    /// Fetch the challenger leaderboard for a ranked queue.
    async fn get_challenger_leaderboard(&self, queue: QueueType) -> ClientResult<TableData>;

    /// Fetch the champion reference table.
    async fn get_champions(&self) -> ClientResult<TableData>;

    /// Fetch the queue-type reference table.
    async fn get_queue_types(&self) -> ClientResult<TableData>;
}
