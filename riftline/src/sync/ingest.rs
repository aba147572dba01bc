//! Match detail ingestor: fetch and persist one match, isolating failure.

use riot_client::{CellValue, MatchHistoryApi, TableData};

use crate::persistence::{AppendOutcome, SqlStore};
use crate::sync::SyncError;

/// Outcome of ingesting a single match.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Detail and timeline bundles fully persisted.
    Ingested,
    /// Failed after at least one row was durably written. Accepted partial
    /// state: rows inserted before the failure stay in place.
    PartialFailure(String),
    /// Failed before anything was written; the diff on the next run
    /// rediscovers the match and retries it.
    Failure(String),
}

/// Fetch and persist the detail and timeline bundles for `game_id`.
///
/// Every error is caught at this boundary, logged with the match id, and
/// folded into the outcome — one broken match must not abort its siblings.
/// Key collisions on individual rows are benign no-ops: a re-run or a
/// concurrent sync may legitimately re-attempt the same match.
pub async fn ingest_match<A: MatchHistoryApi>(
    api: &A,
    store: &SqlStore,
    game_id: i64,
) -> IngestOutcome {
    let mut wrote_rows = false;
    match ingest_inner(api, store, game_id, &mut wrote_rows).await {
        Ok(()) => {
            tracing::info!(game_id, "match ingested");
            IngestOutcome::Ingested
        }
        Err(e) => {
            tracing::error!(game_id, error = %e, "failed to ingest match");
            if wrote_rows {
                IngestOutcome::PartialFailure(e.to_string())
            } else {
                IngestOutcome::Failure(e.to_string())
            }
        }
    }
}

async fn ingest_inner<A: MatchHistoryApi>(
    api: &A,
    store: &SqlStore,
    game_id: i64,
    wrote_rows: &mut bool,
) -> Result<(), SyncError> {
    let details = api.get_match_details(game_id).await?;
    for (name, table) in &details {
        append_table(store, name, table, wrote_rows).await?;
    }

    // Timeline schemas vary across game versions; flattening every cell to
    // its textual form keeps the table shape stable.
    let timeline = api.get_timeline(game_id).await?;
    for (name, table) in &timeline {
        let table = normalize_table(table);
        append_table(store, name, &table, wrote_rows).await?;
    }

    Ok(())
}

async fn append_table(
    store: &SqlStore,
    name: &str,
    table: &TableData,
    wrote_rows: &mut bool,
) -> Result<(), SyncError> {
    let key = table.key_columns();
    for row in &table.rows {
        match store.append_row(name, &key, row).await? {
            AppendOutcome::Inserted => *wrote_rows = true,
            AppendOutcome::DuplicateKey => {
                tracing::debug!(table = name, "duplicate row skipped");
            }
        }
    }
    Ok(())
}

/// Normalize every cell to its textual form; NULL stays NULL.
pub(crate) fn normalize_table(table: &TableData) -> TableData {
    TableData {
        key: table.key.clone(),
        rows: table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, cell)| {
                        let cell = match cell.to_text() {
                            Some(text) => CellValue::Text(text),
                            None => CellValue::Null,
                        };
                        (column.clone(), cell)
                    })
                    .collect()
            })
            .collect(),
    }
}
