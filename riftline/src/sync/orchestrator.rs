//! Sync orchestrator: drives the end-to-end flow for one player.

use riot_client::{MatchFilters, MatchHistoryApi, PlayerLookup};

use crate::persistence::SqlStore;
use crate::sync::{index, ingest, player, IngestOutcome, SyncError, SyncReport};

/// Owns one remote API client and one store handle; each call to
/// [`Syncer::sync_player`] is one self-contained sync run.
pub struct Syncer<A> {
    api: A,
    store: SqlStore,
}

impl<A: MatchHistoryApi> Syncer<A> {
    pub fn new(api: A, store: SqlStore) -> Self {
        Self { api, store }
    }

    /// Sync one player: resolve → merge → list candidates → diff → ingest
    /// each new match sequentially, in the order the remote API returned
    /// them.
    ///
    /// Failure policy, step by step:
    /// - player resolve/merge errors abort the run (`Err`);
    /// - a missing player is a normal empty result, not an error;
    /// - listing/diff errors degrade the run to an all-zero report — the
    ///   matches are still absent from the store, so the next run picks
    ///   them up again;
    /// - per-match errors are recorded in the report and never abort
    ///   sibling matches.
    pub async fn sync_player(
        &self,
        summoner_name: &str,
        limit: u32,
        filters: &MatchFilters,
    ) -> Result<SyncReport, SyncError> {
        tracing::info!(player = summoner_name, "starting sync run");

        let lookup = PlayerLookup::Name(summoner_name.to_string());
        let Some(resolved) = self.api.get_player(&lookup).await? else {
            tracing::info!(player = summoner_name, "player not found");
            return Ok(SyncReport::default());
        };
        player::upsert_player(&self.store, &resolved).await?;

        let summaries = match self
            .api
            .get_match_history(&resolved.account_id, filters, limit)
            .await
        {
            Ok(summaries) => summaries,
            Err(e) => {
                tracing::error!(player = summoner_name, error = %e, "failed to fetch match history");
                return Ok(SyncReport::default());
            }
        };
        if summaries.is_empty() {
            tracing::info!(player = summoner_name, "no new matches");
            return Ok(SyncReport::default());
        }

        // Candidate ids in remote order; first appearance wins so a match
        // repeated in the listing is only attempted once.
        let mut candidates: Vec<i64> = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            if !candidates.contains(&summary.game_id) {
                candidates.push(summary.game_id);
            }
        }

        let new_ids = match index::filter_new(&self.store, &candidates).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(player = summoner_name, error = %e, "failed to diff candidate matches");
                return Ok(SyncReport::default());
            }
        };
        tracing::info!(
            player = summoner_name,
            new = new_ids.len(),
            total = candidates.len(),
            "diffed candidate matches"
        );

        let mut report = SyncReport {
            candidates: candidates.len(),
            already_loaded: candidates.len() - new_ids.len(),
            ..SyncReport::default()
        };

        for game_id in &candidates {
            if !new_ids.contains(game_id) {
                continue;
            }
            match ingest::ingest_match(&self.api, &self.store, *game_id).await {
                IngestOutcome::Ingested => report.ingested += 1,
                IngestOutcome::PartialFailure(reason) | IngestOutcome::Failure(reason) => {
                    report.failed.push((*game_id, reason));
                }
            }
        }

        tracing::info!(
            player = summoner_name,
            ingested = report.ingested,
            failed = report.failed.len(),
            "sync run complete"
        );
        Ok(report)
    }
}
