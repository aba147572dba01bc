//! Flattening of remote JSON documents into relational table bundles.
//!
//! The detail and timeline endpoints return one nested document per match.
//! The store wants flat rows keyed by the match identifier, so each document
//! is split into named tables here, with column names converted to
//! snake_case. Cells keep their native scalar types; values that stay nested
//! (ban lists, event positions) are carried as [`CellValue::Nested`].

use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};
use crate::types::{CellValue, Row, TableBundle, TableData};

/// Convert a camelCase JSON field name to a snake_case column name.
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Build a row from a JSON object, skipping the named fields.
/// Non-scalar values become [`CellValue::Nested`].
fn row_from_object(obj: &Map<String, Value>, skip: &[&str]) -> Row {
    let mut row = Row::new();
    for (field, value) in obj {
        if skip.contains(&field.as_str()) {
            continue;
        }
        row.insert(to_snake_case(field), CellValue::from_json(value));
    }
    row
}

fn as_object<'a>(value: &'a Value, what: &str) -> ClientResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ClientError::InvalidData(format!("{} is not a JSON object", what)))
}

fn require_i64(obj: &Map<String, Value>, field: &str, what: &str) -> ClientResult<i64> {
    obj.get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| ClientError::InvalidData(format!("{} is missing integer '{}'", what, field)))
}

/// Split a match detail document into its five tables:
/// `matches`, `teams`, `bans`, `participants`, `stats`.
pub(crate) fn flatten_match(doc: &Value) -> ClientResult<TableBundle> {
    let root = as_object(doc, "match detail")?;
    let game_id = require_i64(root, "gameId", "match detail")?;
    let game_id_cell = CellValue::Integer(game_id);

    let mut matches = TableData::new(&["game_id"]);
    let mut match_row = row_from_object(root, &["teams", "participants", "participantIdentities"]);
    match_row.insert("game_id".to_string(), game_id_cell.clone());
    matches.rows.push(match_row);

    let mut teams = TableData::new(&["game_id", "team_id"]);
    let mut bans = TableData::new(&["game_id", "team_id", "pick_turn"]);
    for team in root.get("teams").and_then(Value::as_array).unwrap_or(&vec![]) {
        let team_obj = as_object(team, "team")?;
        let team_id = require_i64(team_obj, "teamId", "team")?;

        let mut team_row = row_from_object(team_obj, &["bans"]);
        team_row.insert("game_id".to_string(), game_id_cell.clone());
        teams.rows.push(team_row);

        for ban in team_obj.get("bans").and_then(Value::as_array).unwrap_or(&vec![]) {
            let ban_obj = as_object(ban, "ban")?;
            let mut ban_row = row_from_object(ban_obj, &[]);
            ban_row.insert("game_id".to_string(), game_id_cell.clone());
            ban_row.insert("team_id".to_string(), CellValue::Integer(team_id));
            bans.rows.push(ban_row);
        }
    }

    let mut participants = TableData::new(&["game_id", "participant_id"]);
    let mut stats = TableData::new(&["game_id", "team_id", "participant_id"]);
    for participant in root
        .get("participants")
        .and_then(Value::as_array)
        .unwrap_or(&vec![])
    {
        let part_obj = as_object(participant, "participant")?;
        let participant_id = require_i64(part_obj, "participantId", "participant")?;
        let team_id = require_i64(part_obj, "teamId", "participant")?;

        let mut part_row = row_from_object(part_obj, &["stats", "timeline", "runes", "masteries"]);
        part_row.insert("game_id".to_string(), game_id_cell.clone());
        // The per-participant timeline sub-object carries the assigned role
        // and lane; only those two scalars belong on the participant row.
        if let Some(tl) = part_obj.get("timeline").and_then(Value::as_object) {
            for field in ["role", "lane"] {
                if let Some(value) = tl.get(field) {
                    part_row.insert(field.to_string(), CellValue::from_json(value));
                }
            }
        }
        participants.rows.push(part_row);

        if let Some(stat_obj) = part_obj.get("stats").and_then(Value::as_object) {
            let mut stat_row = row_from_object(stat_obj, &[]);
            stat_row.insert("game_id".to_string(), game_id_cell.clone());
            stat_row.insert("team_id".to_string(), CellValue::Integer(team_id));
            stat_row.insert(
                "participant_id".to_string(),
                CellValue::Integer(participant_id),
            );
            stats.rows.push(stat_row);
        }
    }

    let mut bundle = TableBundle::new();
    bundle.insert("matches".to_string(), matches);
    bundle.insert("teams".to_string(), teams);
    bundle.insert("bans".to_string(), bans);
    bundle.insert("participants".to_string(), participants);
    bundle.insert("stats".to_string(), stats);
    Ok(bundle)
}

/// Split a match timeline document into `timeline_frames` and
/// `timeline_events`. The timeline endpoint does not repeat the match
/// identifier, so it is passed in and stamped onto every row.
pub(crate) fn flatten_timeline(game_id: i64, doc: &Value) -> ClientResult<TableBundle> {
    let root = as_object(doc, "timeline")?;
    let game_id_cell = CellValue::Integer(game_id);

    let mut frames = TableData::new(&["game_id", "frame_timestamp", "participant_id"]);
    let mut events = TableData::new(&["game_id", "frame_timestamp", "event_index"]);

    for frame in root
        .get("frames")
        .and_then(Value::as_array)
        .unwrap_or(&vec![])
    {
        let frame_obj = as_object(frame, "timeline frame")?;
        let frame_ts = require_i64(frame_obj, "timestamp", "timeline frame")?;
        let frame_ts_cell = CellValue::Integer(frame_ts);

        if let Some(pframes) = frame_obj.get("participantFrames").and_then(Value::as_object) {
            for (key, pframe) in pframes {
                let pframe_obj = as_object(pframe, "participant frame")?;
                let participant_id = pframe_obj
                    .get("participantId")
                    .and_then(Value::as_i64)
                    .or_else(|| key.parse().ok())
                    .ok_or_else(|| {
                        ClientError::InvalidData(format!(
                            "participant frame '{}' has no participant id",
                            key
                        ))
                    })?;

                let mut row = row_from_object(pframe_obj, &[]);
                row.insert("game_id".to_string(), game_id_cell.clone());
                row.insert("frame_timestamp".to_string(), frame_ts_cell.clone());
                row.insert(
                    "participant_id".to_string(),
                    CellValue::Integer(participant_id),
                );
                frames.rows.push(row);
            }
        }

        for (index, event) in frame_obj
            .get("events")
            .and_then(Value::as_array)
            .unwrap_or(&vec![])
            .iter()
            .enumerate()
        {
            let event_obj = as_object(event, "timeline event")?;
            let mut row = row_from_object(event_obj, &[]);
            row.insert("game_id".to_string(), game_id_cell.clone());
            row.insert("frame_timestamp".to_string(), frame_ts_cell.clone());
            row.insert("event_index".to_string(), CellValue::Integer(index as i64));
            events.rows.push(row);
        }
    }

    let mut bundle = TableBundle::new();
    bundle.insert("timeline_frames".to_string(), frames);
    bundle.insert("timeline_events".to_string(), events);
    Ok(bundle)
}
