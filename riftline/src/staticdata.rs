//! Static reference-data refresh: leaderboards, champions, queue types.
//!
//! No incremental logic here — each table is replaced wholesale on every
//! refresh.

use riot_client::{MatchHistoryApi, QueueType, TableData};

use crate::persistence::SqlStore;
use crate::sync::SyncError;

/// Refresh all static reference tables. Any remote or store error aborts
/// the refresh; the tables are independent, so a re-run completes whatever
/// was left.
pub async fn refresh_static_data<A: MatchHistoryApi>(
    api: &A,
    store: &SqlStore,
) -> Result<(), SyncError> {
    let solo = api.get_challenger_leaderboard(QueueType::RankedSolo).await?;
    replace(store, "leaderboard_solo", &solo).await?;

    let flex = api.get_challenger_leaderboard(QueueType::RankedFlex).await?;
    replace(store, "leaderboard_flex", &flex).await?;

    let champions = api.get_champions().await?;
    replace(store, "champions", &champions).await?;

    let queues = api.get_queue_types().await?;
    replace(store, "queues", &queues).await?;

    Ok(())
}

async fn replace(store: &SqlStore, table: &str, data: &TableData) -> Result<(), SyncError> {
    store
        .replace_table(table, &data.key_columns(), &data.rows)
        .await?;
    tracing::info!(table, rows = data.rows.len(), "refreshed static table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;
    use riot_client::{CellValue, MockRiotApi, Row};

    async fn test_store() -> SqlStore {
        let db = Database::new_in_memory().await.unwrap();
        SqlStore::new(db.pool().clone())
    }

    fn leaderboard(queue: QueueType, entries: i64) -> TableData {
        let mut table = TableData::new(&["summoner_id"]);
        for i in 0..entries {
            let mut row = Row::new();
            row.insert(
                "summoner_id".to_string(),
                CellValue::Text(format!("s-{}", i)),
            );
            row.insert(
                "queue".to_string(),
                CellValue::Text(queue.as_str().to_string()),
            );
            row.insert("league_points".to_string(), CellValue::Integer(1000 + i));
            table.rows.push(row);
        }
        table
    }

    fn champions() -> TableData {
        let mut table = TableData::new(&["champion_id"]);
        let mut row = Row::new();
        row.insert("champion_id".to_string(), CellValue::Integer(57));
        row.insert("name".to_string(), CellValue::Text("Maokai".to_string()));
        table.rows.push(row);
        table
    }

    fn queues() -> TableData {
        let mut table = TableData::new(&["queue_id"]);
        let mut row = Row::new();
        row.insert("queue_id".to_string(), CellValue::Integer(420));
        row.insert(
            "description".to_string(),
            CellValue::Text("5v5 Ranked Solo games".to_string()),
        );
        table.rows.push(row);
        table
    }

    fn full_api() -> MockRiotApi {
        MockRiotApi::new()
            .with_leaderboard_response(|queue| Ok(leaderboard(queue, 3)))
            .with_champions_response(|| Ok(champions()))
            .with_queue_types_response(|| Ok(queues()))
    }

    async fn count(store: &SqlStore, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
        let row: (i64,) = sqlx::query_as(&sql)
            .fetch_one(store.pool())
            .await
            .unwrap();
        row.0
    }

    #[tokio::test]
    async fn test_refresh_creates_all_tables() {
        let store = test_store().await;
        refresh_static_data(&full_api(), &store).await.unwrap();

        assert_eq!(count(&store, "leaderboard_solo").await, 3);
        assert_eq!(count(&store, "leaderboard_flex").await, 3);
        assert_eq!(count(&store, "champions").await, 1);
        assert_eq!(count(&store, "queues").await, 1);
    }

    #[tokio::test]
    async fn test_refresh_replaces_instead_of_accumulating() {
        let store = test_store().await;
        refresh_static_data(&full_api(), &store).await.unwrap();
        refresh_static_data(&full_api(), &store).await.unwrap();

        assert_eq!(count(&store, "leaderboard_solo").await, 3);
        assert_eq!(count(&store, "champions").await, 1);
    }
}
