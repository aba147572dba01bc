//! Match index: diff candidate match ids against the store.

use std::collections::BTreeSet;

use crate::persistence::{SqlStore, StoreError};

/// The match-metadata table; a match counts as loaded once its row is here.
pub const MATCH_TABLE: &str = "matches";
pub const MATCH_KEY: &str = "game_id";

/// Return the subset of `candidates` not yet present in the store.
///
/// Issues a single existence query restricted to the candidate ids. On the
/// very first sync the match table does not exist at all; that reads as
/// "nothing loaded", not as an error.
pub async fn filter_new(
    store: &SqlStore,
    candidates: &[i64],
) -> Result<BTreeSet<i64>, StoreError> {
    if candidates.is_empty() {
        return Ok(BTreeSet::new());
    }

    let existing = store.exists_any(MATCH_TABLE, MATCH_KEY, candidates).await?;
    Ok(candidates
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;
    use riot_client::{CellValue, Row};

    async fn test_store() -> SqlStore {
        let db = Database::new_in_memory().await.unwrap();
        SqlStore::new(db.pool().clone())
    }

    async fn insert_match(store: &SqlStore, game_id: i64) {
        let mut row = Row::new();
        row.insert("game_id".to_string(), CellValue::Integer(game_id));
        row.insert("queue_id".to_string(), CellValue::Integer(420));
        store
            .append_row(MATCH_TABLE, &[MATCH_KEY], &row)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_sync_all_new() {
        let store = test_store().await;
        let new = filter_new(&store, &[1, 2, 3]).await.unwrap();
        assert_eq!(new, BTreeSet::from([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_known_matches_excluded() {
        let store = test_store().await;
        insert_match(&store, 2).await;
        let new = filter_new(&store, &[1, 2, 3]).await.unwrap();
        assert_eq!(new, BTreeSet::from([1, 3]));
    }

    #[tokio::test]
    async fn test_all_known_yields_empty() {
        let store = test_store().await;
        insert_match(&store, 1).await;
        insert_match(&store, 2).await;
        let new = filter_new(&store, &[1, 2]).await.unwrap();
        assert!(new.is_empty());
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let store = test_store().await;
        let new = filter_new(&store, &[]).await.unwrap();
        assert!(new.is_empty());
    }
}
