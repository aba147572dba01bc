//! Riot HTTP client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::flatten::{flatten_match, flatten_timeline, to_snake_case};
use crate::traits::MatchHistoryApi;
use crate::types::{
    CellValue, MatchFilters, MatchSummary, Player, PlayerLookup, QueueType, TableBundle, TableData,
};

/// Upper bound on any single remote request. A timeout surfaces as an
/// ordinary transport failure at whichever sync step issued the call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DDRAGON_URL: &str = "https://ddragon.leagueoflegends.com";
const QUEUES_DOC_URL: &str = "https://static.developer.riotgames.com/docs/lol/queues.json";

/// Network client for the Riot match-history API.
///
/// One client per region; the API key is sent as the `X-Riot-Token` header
/// on every platform request.
pub struct HttpRiotClient {
    http: reqwest::Client,
    base_url: String,
    region: String,
    api_key: String,
}

impl HttpRiotClient {
    /// Build a client for a platform region (e.g. `euw1`, `na1`).
    pub fn new(region: &str, api_key: String) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("https://{}.api.riotgames.com", region),
            region: region.to_string(),
            api_key,
        })
    }

    /// GET a JSON document. `Ok(None)` means 404 — an absent resource, which
    /// callers interpret per endpoint (unknown player, empty match history).
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> ClientResult<Option<Value>> {
        tracing::debug!(url, "requesting remote endpoint");

        let response = self
            .http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(ClientError::RateLimited { retry_after_secs })
            }
            s => Err(ClientError::Api {
                status: s.as_u16(),
                endpoint: url.to_string(),
            }),
        }
    }

    /// GET a JSON document where 404 is not a valid answer (per-match
    /// endpoints addressed by an id the listing just returned).
    async fn require_json(&self, url: &str) -> ClientResult<Value> {
        self.get_json(url, &[]).await?.ok_or_else(|| ClientError::Api {
            status: 404,
            endpoint: url.to_string(),
        })
    }
}

#[async_trait]
impl MatchHistoryApi for HttpRiotClient {
    async fn get_player(&self, lookup: &PlayerLookup) -> ClientResult<Option<Player>> {
        let path = match lookup {
            PlayerLookup::Name(name) => format!("/lol/summoner/v4/summoners/by-name/{}", name),
            PlayerLookup::AccountId(id) => format!("/lol/summoner/v4/summoners/by-account/{}", id),
            PlayerLookup::Puuid(puuid) => format!("/lol/summoner/v4/summoners/by-puuid/{}", puuid),
            PlayerLookup::SummonerId(id) => format!("/lol/summoner/v4/summoners/{}", id),
        };

        let url = format!("{}{}", self.base_url, path);
        let Some(doc) = self.get_json(&url, &[]).await? else {
            return Ok(None);
        };
        let mut player = parse_summoner(&doc, &self.region)?;

        // Rank attributes come from a second endpoint and are optional:
        // unranked players simply have no entry there.
        let entries_url = format!(
            "{}/lol/league/v4/entries/by-summoner/{}",
            self.base_url, player.summoner_id
        );
        if let Some(entries) = self.get_json(&entries_url, &[]).await? {
            apply_rank(&mut player, &entries);
        }

        Ok(Some(player))
    }

    async fn get_match_history(
        &self,
        account_id: &str,
        filters: &MatchFilters,
        limit: u32,
    ) -> ClientResult<Vec<MatchSummary>> {
        let url = format!(
            "{}/lol/match/v4/matchlists/by-account/{}",
            self.base_url, account_id
        );

        let mut query: Vec<(&str, String)> = vec![("endIndex", limit.to_string())];
        if let Some(champion) = filters.champion {
            query.push(("champion", champion.to_string()));
        }
        if let Some(season) = filters.season {
            query.push(("season", season.to_string()));
        }
        if let Some(queue) = filters.queue {
            query.push(("queue", queue.to_string()));
        }
        if let Some(begin_time) = filters.begin_time {
            query.push(("beginTime", begin_time.to_string()));
        }
        if let Some(ref patch) = filters.patch {
            query.push(("patch", patch.clone()));
        }

        // 404 here means "no matches for these filters", not a failure.
        match self.get_json(&url, &query).await? {
            Some(doc) => parse_match_list(&doc),
            None => Ok(Vec::new()),
        }
    }

    async fn get_match_details(&self, game_id: i64) -> ClientResult<TableBundle> {
        let url = format!("{}/lol/match/v4/matches/{}", self.base_url, game_id);
        let doc = self.require_json(&url).await?;
        flatten_match(&doc)
    }

    async fn get_timeline(&self, game_id: i64) -> ClientResult<TableBundle> {
        let url = format!(
            "{}/lol/match/v4/timelines/by-match/{}",
            self.base_url, game_id
        );
        let doc = self.require_json(&url).await?;
        flatten_timeline(game_id, &doc)
    }

    async fn get_challenger_leaderboard(&self, queue: QueueType) -> ClientResult<TableData> {
        let url = format!(
            "{}/lol/league/v4/challengerleagues/by-queue/{}",
            self.base_url,
            queue.as_str()
        );
        let doc = self.require_json(&url).await?;
        parse_leaderboard(&doc)
    }

    async fn get_champions(&self) -> ClientResult<TableData> {
        let versions = self
            .require_json(&format!("{}/api/versions.json", DDRAGON_URL))
            .await?;
        let version = versions
            .as_array()
            .and_then(|v| v.first())
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::InvalidData("empty version list".to_string()))?
            .to_string();

        let doc = self
            .require_json(&format!(
                "{}/cdn/{}/data/en_US/champion.json",
                DDRAGON_URL, version
            ))
            .await?;
        parse_champions(&doc, &version)
    }

    async fn get_queue_types(&self) -> ClientResult<TableData> {
        let doc = self.require_json(QUEUES_DOC_URL).await?;
        parse_queues(&doc)
    }
}

fn str_field(doc: &Value, field: &str) -> ClientResult<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::InvalidData(format!("missing string field '{}'", field)))
}

fn i64_field(doc: &Value, field: &str) -> ClientResult<i64> {
    doc.get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| ClientError::InvalidData(format!("missing integer field '{}'", field)))
}

fn parse_summoner(doc: &Value, region: &str) -> ClientResult<Player> {
    Ok(Player {
        account_id: str_field(doc, "accountId")?,
        summoner_id: str_field(doc, "id")?,
        puuid: str_field(doc, "puuid")?,
        summoner_name: str_field(doc, "name")?,
        region: region.to_string(),
        profile_icon_id: i64_field(doc, "profileIconId")?,
        summoner_level: i64_field(doc, "summonerLevel")?,
        revision_date: i64_field(doc, "revisionDate")?,
        rank_tier: None,
        rank_division: None,
        league_points: None,
        wins: None,
        losses: None,
    })
}

/// Fill in rank attributes from the league entries document, preferring the
/// solo-queue entry when the player is ranked in several queues.
fn apply_rank(player: &mut Player, entries: &Value) {
    let Some(entries) = entries.as_array() else {
        return;
    };
    let entry = entries
        .iter()
        .find(|e| e.get("queueType").and_then(Value::as_str) == Some("RANKED_SOLO_5x5"))
        .or_else(|| entries.first());
    let Some(entry) = entry else {
        return;
    };

    player.rank_tier = entry.get("tier").and_then(Value::as_str).map(str::to_string);
    player.rank_division = entry.get("rank").and_then(Value::as_str).map(str::to_string);
    player.league_points = entry.get("leaguePoints").and_then(Value::as_i64);
    player.wins = entry.get("wins").and_then(Value::as_i64);
    player.losses = entry.get("losses").and_then(Value::as_i64);
}

fn parse_match_list(doc: &Value) -> ClientResult<Vec<MatchSummary>> {
    let matches = doc
        .get("matches")
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::InvalidData("match list has no 'matches' array".to_string()))?;

    matches
        .iter()
        .map(|entry| {
            Ok(MatchSummary {
                game_id: i64_field(entry, "gameId")?,
                champion: i64_field(entry, "champion")?,
                queue: i64_field(entry, "queue")?,
                season: i64_field(entry, "season")?,
                timestamp: i64_field(entry, "timestamp")?,
                role: entry.get("role").and_then(Value::as_str).map(str::to_string),
                lane: entry.get("lane").and_then(Value::as_str).map(str::to_string),
                platform_id: str_field(entry, "platformId")?,
            })
        })
        .collect()
}

fn parse_leaderboard(doc: &Value) -> ClientResult<TableData> {
    let queue = doc.get("queue").and_then(Value::as_str).unwrap_or_default();
    let entries = doc
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::InvalidData("leaderboard has no 'entries' array".to_string()))?;

    let mut table = TableData::new(&["summoner_id"]);
    for entry in entries {
        let obj = entry.as_object().ok_or_else(|| {
            ClientError::InvalidData("leaderboard entry is not an object".to_string())
        })?;
        let mut row = crate::types::Row::new();
        for (field, value) in obj {
            row.insert(to_snake_case(field), CellValue::from_json(value));
        }
        row.insert("queue".to_string(), CellValue::Text(queue.to_string()));
        table.rows.push(row);
    }
    Ok(table)
}

fn parse_champions(doc: &Value, version: &str) -> ClientResult<TableData> {
    let data = doc
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| ClientError::InvalidData("champion doc has no 'data' object".to_string()))?;

    let mut table = TableData::new(&["champion_id"]);
    for champion in data.values() {
        let champion_id: i64 = str_field(champion, "key")?
            .parse()
            .map_err(|_| ClientError::InvalidData("champion key is not numeric".to_string()))?;

        let mut row = crate::types::Row::new();
        row.insert("champion_id".to_string(), CellValue::Integer(champion_id));
        row.insert("name".to_string(), CellValue::Text(str_field(champion, "name")?));
        row.insert(
            "title".to_string(),
            CellValue::Text(str_field(champion, "title")?),
        );
        row.insert("version".to_string(), CellValue::Text(version.to_string()));
        table.rows.push(row);
    }
    Ok(table)
}

fn parse_queues(doc: &Value) -> ClientResult<TableData> {
    let queues = doc
        .as_array()
        .ok_or_else(|| ClientError::InvalidData("queue doc is not an array".to_string()))?;

    let mut table = TableData::new(&["queue_id"]);
    for queue in queues {
        let obj = queue.as_object().ok_or_else(|| {
            ClientError::InvalidData("queue entry is not an object".to_string())
        })?;
        let mut row = crate::types::Row::new();
        for (field, value) in obj {
            row.insert(to_snake_case(field), CellValue::from_json(value));
        }
        table.rows.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summoner_doc() -> Value {
        json!({
            "id": "anpV82GS-2ttqicGTuOIqGePQy8VQ_7bzmQC2QKECB4erQ0d2lBiRxfmmw",
            "accountId": "yuyL70rEQX0f1p5isdmrb4XHKkbLy8J5V-t2WLK1OgHR739fbMuOICfE",
            "puuid": "qU_rNlRS9QW4o8-68R-HM3xADHpgURMjUKkdHVxGZ0Z7k3kLF_wLpiVVXL7iDkMiG01hrRVSjR7HjA",
            "name": "RonjaRaumpilot",
            "profileIconId": 4368,
            "summonerLevel": 113,
            "revisionDate": 1610925255806i64
        })
    }

    #[test]
    fn test_parse_summoner() {
        let player = parse_summoner(&summoner_doc(), "euw1").unwrap();
        assert_eq!(player.summoner_name, "RonjaRaumpilot");
        assert_eq!(player.region, "euw1");
        assert_eq!(player.summoner_level, 113);
        assert_eq!(player.rank_tier, None);
    }

    #[test]
    fn test_parse_summoner_missing_field() {
        let result = parse_summoner(&json!({ "name": "x" }), "euw1");
        assert!(matches!(result, Err(ClientError::InvalidData(_))));
    }

    #[test]
    fn test_apply_rank_prefers_solo_queue() {
        let mut player = parse_summoner(&summoner_doc(), "euw1").unwrap();
        apply_rank(
            &mut player,
            &json!([
                { "queueType": "RANKED_FLEX_SR", "tier": "GOLD", "rank": "II",
                  "leaguePoints": 21, "wins": 10, "losses": 12 },
                { "queueType": "RANKED_SOLO_5x5", "tier": "PLATINUM", "rank": "IV",
                  "leaguePoints": 56, "wins": 88, "losses": 80 }
            ]),
        );
        assert_eq!(player.rank_tier.as_deref(), Some("PLATINUM"));
        assert_eq!(player.rank_division.as_deref(), Some("IV"));
        assert_eq!(player.league_points, Some(56));
    }

    #[test]
    fn test_apply_rank_unranked_leaves_defaults() {
        let mut player = parse_summoner(&summoner_doc(), "euw1").unwrap();
        apply_rank(&mut player, &json!([]));
        assert_eq!(player.rank_tier, None);
        assert_eq!(player.league_points, None);
    }

    #[test]
    fn test_parse_match_list() {
        let doc = json!({
            "matches": [
                { "gameId": 5148931825i64, "champion": 154, "queue": 420,
                  "season": 13, "timestamp": 1610622113314i64,
                  "role": "SOLO", "lane": "TOP", "platformId": "EUW1" }
            ],
            "startIndex": 0,
            "endIndex": 100,
            "totalGames": 1
        });
        let matches = parse_match_list(&doc).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].game_id, 5148931825);
        assert_eq!(matches[0].champion, 154);
        assert_eq!(matches[0].lane.as_deref(), Some("TOP"));
    }

    #[test]
    fn test_parse_leaderboard() {
        let doc = json!({
            "queue": "RANKED_SOLO_5x5",
            "tier": "CHALLENGER",
            "entries": [
                { "summonerId": "abc", "summonerName": "TopOne",
                  "leaguePoints": 1204, "wins": 300, "losses": 200 }
            ]
        });
        let table = parse_leaderboard(&doc).unwrap();
        assert_eq!(table.key, vec!["summoner_id"]);
        let row = &table.rows[0];
        assert_eq!(row["summoner_id"], CellValue::Text("abc".to_string()));
        assert_eq!(row["league_points"], CellValue::Integer(1204));
        assert_eq!(
            row["queue"],
            CellValue::Text("RANKED_SOLO_5x5".to_string())
        );
    }

    #[test]
    fn test_parse_champions() {
        let doc = json!({
            "data": {
                "Maokai": { "key": "57", "name": "Maokai", "title": "the Twisted Treant" }
            }
        });
        let table = parse_champions(&doc, "11.1.1").unwrap();
        assert_eq!(table.key, vec!["champion_id"]);
        let row = &table.rows[0];
        assert_eq!(row["champion_id"], CellValue::Integer(57));
        assert_eq!(row["version"], CellValue::Text("11.1.1".to_string()));
    }

    #[test]
    fn test_parse_queues() {
        let doc = json!([
            { "queueId": 420, "map": "Summoner's Rift",
              "description": "5v5 Ranked Solo games", "notes": null }
        ]);
        let table = parse_queues(&doc).unwrap();
        assert_eq!(table.key, vec!["queue_id"]);
        let row = &table.rows[0];
        assert_eq!(row["queue_id"], CellValue::Integer(420));
        assert_eq!(row["notes"], CellValue::Null);
    }
}
