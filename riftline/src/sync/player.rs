//! Player store adapter: upsert-by-identity for the player record.

use riot_client::{CellValue, Player, Row};

use crate::persistence::{SqlStore, StoreError};

pub const PLAYER_TABLE: &str = "players";
const PLAYER_KEY: &[&str] = &["account_id"];

/// Merge a player record by account id and return the id. Repeating the
/// same merge is a no-op row-count-wise; mutable attributes (level, rank)
/// are overwritten. A store error here propagates — matches must not be
/// ingested for a player that failed to merge.
pub async fn upsert_player(store: &SqlStore, player: &Player) -> Result<String, StoreError> {
    if player.account_id.is_empty() {
        return Err(StoreError::EmptyKey(PLAYER_TABLE.to_string()));
    }

    store
        .upsert(PLAYER_TABLE, PLAYER_KEY, &player_row(player))
        .await?;
    tracing::debug!(account_id = %player.account_id, "player merged");
    Ok(player.account_id.clone())
}

fn player_row(player: &Player) -> Row {
    let mut row = Row::new();
    row.insert(
        "account_id".to_string(),
        CellValue::Text(player.account_id.clone()),
    );
    row.insert(
        "summoner_id".to_string(),
        CellValue::Text(player.summoner_id.clone()),
    );
    row.insert("puuid".to_string(), CellValue::Text(player.puuid.clone()));
    row.insert(
        "summoner_name".to_string(),
        CellValue::Text(player.summoner_name.clone()),
    );
    row.insert(
        "region".to_string(),
        CellValue::Text(player.region.clone()),
    );
    row.insert(
        "profile_icon_id".to_string(),
        CellValue::Integer(player.profile_icon_id),
    );
    row.insert(
        "summoner_level".to_string(),
        CellValue::Integer(player.summoner_level),
    );
    row.insert(
        "revision_date".to_string(),
        CellValue::Integer(player.revision_date),
    );
    row.insert("rank_tier".to_string(), opt_text(&player.rank_tier));
    row.insert(
        "rank_division".to_string(),
        opt_text(&player.rank_division),
    );
    row.insert(
        "league_points".to_string(),
        opt_integer(player.league_points),
    );
    row.insert("wins".to_string(), opt_integer(player.wins));
    row.insert("losses".to_string(), opt_integer(player.losses));
    row
}

fn opt_text(value: &Option<String>) -> CellValue {
    match value {
        Some(s) => CellValue::Text(s.clone()),
        None => CellValue::Null,
    }
}

fn opt_integer(value: Option<i64>) -> CellValue {
    match value {
        Some(i) => CellValue::Integer(i),
        None => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;

    fn sample_player(account_id: &str) -> Player {
        Player {
            account_id: account_id.to_string(),
            summoner_id: "summoner-1".to_string(),
            puuid: "puuid-1".to_string(),
            summoner_name: "RonjaRaumpilot".to_string(),
            region: "euw1".to_string(),
            profile_icon_id: 4368,
            summoner_level: 113,
            revision_date: 1610925255806,
            rank_tier: Some("PLATINUM".to_string()),
            rank_division: Some("IV".to_string()),
            league_points: Some(56),
            wins: Some(88),
            losses: Some(80),
        }
    }

    async fn test_store() -> SqlStore {
        let db = Database::new_in_memory().await.unwrap();
        SqlStore::new(db.pool().clone())
    }

    #[test]
    fn test_player_row_fields() {
        let row = player_row(&sample_player("acc-1"));
        assert_eq!(row["account_id"], CellValue::Text("acc-1".to_string()));
        assert_eq!(row["summoner_level"], CellValue::Integer(113));
        assert_eq!(
            row["rank_tier"],
            CellValue::Text("PLATINUM".to_string())
        );
    }

    #[test]
    fn test_player_row_unranked_fields_are_null() {
        let mut player = sample_player("acc-1");
        player.rank_tier = None;
        player.league_points = None;
        let row = player_row(&player);
        assert_eq!(row["rank_tier"], CellValue::Null);
        assert_eq!(row["league_points"], CellValue::Null);
    }

    #[tokio::test]
    async fn test_upsert_returns_account_id() {
        let store = test_store().await;
        let id = upsert_player(&store, &sample_player("acc-1"))
            .await
            .unwrap();
        assert_eq!(id, "acc-1");
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row() {
        let store = test_store().await;
        let mut player = sample_player("acc-1");
        upsert_player(&store, &player).await.unwrap();

        player.summoner_level = 114;
        player.rank_tier = Some("DIAMOND".to_string());
        upsert_player(&store, &player).await.unwrap();

        let rows: Vec<(String, i64, String)> =
            sqlx::query_as("SELECT account_id, summoner_level, rank_tier FROM players")
                .fetch_all(store.pool())
                .await
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, 114);
        assert_eq!(rows[0].2, "DIAMOND");
    }

    #[tokio::test]
    async fn test_empty_account_id_rejected() {
        let store = test_store().await;
        let result = upsert_player(&store, &sample_player("")).await;
        assert!(matches!(result, Err(StoreError::EmptyKey(_))));
    }
}
