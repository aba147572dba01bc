//! The incremental synchronization core.
//!
//! One sync run covers one player: resolve and merge the player record,
//! list candidate matches, diff them against the store, and ingest each new
//! match with per-match failure isolation. Data only flows downstream —
//! remote API → store — and a failed match never aborts its siblings; it is
//! simply rediscovered by the diff on the next run.

mod index;
mod ingest;
mod orchestrator;
mod player;


pub use ingest::{ingest_match, IngestOutcome};
pub use orchestrator::Syncer;
pub use player::upsert_player;

use riot_client::ClientError;

use crate::persistence::StoreError;

/// Default number of match summaries fetched per sync run.
pub const DEFAULT_MATCH_LIMIT: u32 = 100;

/// Errors that abort a sync run: a remote failure while resolving the
/// player, or a store failure while merging it. Everything later in the
/// chain degrades instead of aborting (see [`Syncer::sync_player`]).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote API error: {0}")]
    Client(#[from] ClientError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Distinct match ids returned by the remote listing.
    pub candidates: usize,
    /// Candidates skipped because the store already has them.
    pub already_loaded: usize,
    /// Matches fully ingested this run.
    pub ingested: usize,
    /// Matches skipped this run, with the failure reason. A match that
    /// failed before its metadata row landed is rediscovered by the diff
    /// on the next run.
    pub failed: Vec<(i64, String)>,
}
