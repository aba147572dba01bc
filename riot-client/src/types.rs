//! Wire data model shared between the API client and the store.
//!
//! The remote API returns deeply nested JSON; the store consumes flat
//! relational rows. `CellValue`/`Row`/`TableData` are the contract between
//! the two: a bundle is a set of named tables, each carrying its natural-key
//! columns and append-ready rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell in a relational row.
///
/// Scalars keep their native type; arrays and objects are carried as
/// [`CellValue::Nested`] until a sink normalizes them (the timeline path
/// flattens every cell to text via [`CellValue::to_text`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Nested(serde_json::Value),
}

impl CellValue {
    /// Map a JSON value to a cell. Whole numbers become `Integer`, other
    /// numbers `Float`; arrays and objects become `Nested`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => CellValue::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            nested => CellValue::Nested(nested.clone()),
        }
    }

    /// The stable textual form of this cell. Nested values render as compact
    /// JSON so irregular timeline schemas always fit a TEXT column.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Nested(v) => Some(v.to_string()),
        }
    }

    /// Whether this cell is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// One relational row: column name (snake_case) → cell.
pub type Row = BTreeMap<String, CellValue>;

/// Rows for one named table, plus the columns forming its natural key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Natural-key columns, in key order.
    pub key: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn new(key: &[&str]) -> Self {
        Self {
            key: key.iter().map(|k| (*k).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Key columns as borrowed strs, for store calls.
    pub fn key_columns(&self) -> Vec<&str> {
        self.key.iter().map(String::as_str).collect()
    }
}

/// A set of named tables produced by one remote fetch (detail or timeline).
pub type TableBundle = BTreeMap<String, TableData>;

/// A player record as resolved from the remote API.
///
/// `account_id` is the identity key; the rank fields are mutable attributes
/// refreshed on every sync and absent for unranked players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub account_id: String,
    pub summoner_id: String,
    pub puuid: String,
    pub summoner_name: String,
    pub region: String,
    pub profile_icon_id: i64,
    pub summoner_level: i64,
    pub revision_date: i64,
    pub rank_tier: Option<String>,
    pub rank_division: Option<String>,
    pub league_points: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
}

/// A lightweight match reference from the remote listing endpoint.
///
/// Used only as the diffing key against the store; never persisted itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub game_id: i64,
    pub champion: i64,
    pub queue: i64,
    pub season: i64,
    pub timestamp: i64,
    pub role: Option<String>,
    pub lane: Option<String>,
    pub platform_id: String,
}

/// Optional filters for the match listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilters {
    pub champion: Option<i64>,
    pub season: Option<i64>,
    pub patch: Option<String>,
    pub begin_time: Option<i64>,
    pub queue: Option<i64>,
}

/// How to address a player on the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLookup {
    Name(String),
    AccountId(String),
    Puuid(String),
    SummonerId(String),
}

/// Ranked ladder queues with a challenger leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueType {
    RankedSolo,
    RankedFlex,
}

impl QueueType {
    /// The queue identifier used by the league endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueType::RankedSolo => "RANKED_SOLO_5x5",
            QueueType::RankedFlex => "RANKED_FLEX_SR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Bool(true));
        assert_eq!(CellValue::from_json(&json!(42)), CellValue::Integer(42));
        assert_eq!(CellValue::from_json(&json!(1.5)), CellValue::Float(1.5));
        assert_eq!(
            CellValue::from_json(&json!("mid")),
            CellValue::Text("mid".to_string())
        );
    }

    #[test]
    fn test_from_json_nested() {
        let value = json!([1, 2, 3]);
        assert_eq!(
            CellValue::from_json(&value),
            CellValue::Nested(value.clone())
        );
    }

    #[test]
    fn test_to_text_scalars() {
        assert_eq!(CellValue::Null.to_text(), None);
        assert_eq!(CellValue::Integer(7).to_text(), Some("7".to_string()));
        assert_eq!(CellValue::Float(2.5).to_text(), Some("2.5".to_string()));
        assert_eq!(CellValue::Bool(false).to_text(), Some("false".to_string()));
    }

    #[test]
    fn test_to_text_nested_is_compact_json() {
        let cell = CellValue::Nested(json!([1, 2, 3]));
        assert_eq!(cell.to_text(), Some("[1,2,3]".to_string()));
    }

    #[test]
    fn test_queue_type_str() {
        assert_eq!(QueueType::RankedSolo.as_str(), "RANKED_SOLO_5x5");
        assert_eq!(QueueType::RankedFlex.as_str(), "RANKED_FLEX_SR");
    }
}
