use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::app_dirs::AppDirs;
use crate::game::{AllTimeTotals, GameRecord, Player, ScoreEntry};

pub const PLAYERS_KEY: &str = "players";
pub const RECENT_GAMES_KEY: &str = "recent_games";
pub const ALL_TIME_TOTALS_KEY: &str = "all_time_totals";
pub const SESSION_STARTED_AT_KEY: &str = "session_started_at";

/// What a load found: the current field-tagged encoding, a salvaged legacy
/// payload, or nothing usable. Absent keys, undecodable values, and read
/// errors all collapse to `Missing`; callers treat it as "never saved".
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Current(T),
    Legacy(T),
    Missing,
}

impl<T> Loaded<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Loaded::Current(value) | Loaded::Legacy(value) => Some(value),
            Loaded::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Loaded::Missing)
    }
}

/// Durable key-value store for the session state: one JSON value per
/// collection, written synchronously on every mutation.
#[derive(Debug)]
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Opens the store at the default state path under $HOME
    pub fn open() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("wats_state.db"));
        Self::open_at(db_path)
    }

    /// Opens (or creates) a store at an explicit path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                        Some(format!("Failed to create directory: {}", e)),
                    )
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;

        Ok(StateStore { conn })
    }

    pub fn save_players(&self, players: &[Player]) -> Result<()> {
        self.save_json(PLAYERS_KEY, &players)
    }

    pub fn load_players(&self) -> Loaded<Vec<Player>> {
        match self.get(PLAYERS_KEY) {
            Ok(Some(raw)) => decode_players(&raw),
            _ => Loaded::Missing,
        }
    }

    pub fn save_recent_games(&self, games: &[GameRecord]) -> Result<()> {
        self.save_json(RECENT_GAMES_KEY, &games)
    }

    pub fn load_recent_games(&self) -> Loaded<Vec<GameRecord>> {
        match self.get(RECENT_GAMES_KEY) {
            Ok(Some(raw)) => decode_recent_games(&raw),
            _ => Loaded::Missing,
        }
    }

    pub fn save_all_time_totals(&self, totals: &AllTimeTotals) -> Result<()> {
        self.save_json(ALL_TIME_TOTALS_KEY, totals)
    }

    pub fn load_all_time_totals(&self) -> Loaded<AllTimeTotals> {
        match self.get(ALL_TIME_TOTALS_KEY) {
            Ok(Some(raw)) => decode_all_time_totals(&raw),
            _ => Loaded::Missing,
        }
    }

    pub fn save_session_started_at(&self, at: DateTime<Local>) -> Result<()> {
        self.save_json(SESSION_STARTED_AT_KEY, &at)
    }

    pub fn load_session_started_at(&self) -> Loaded<DateTime<Local>> {
        match self.get(SESSION_STARTED_AT_KEY) {
            Ok(Some(raw)) => decode_session_started_at(&raw),
            _ => Loaded::Missing,
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        // An unencodable value must never clobber the previous durable one
        match serde_json::to_string(value) {
            Ok(json) => self.put(key, &json),
            Err(_) => Ok(()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }
}

/// Decodes a players payload: the current schema first, then the legacy
/// loose-dictionary one. Kept as a pure function so both paths are testable
/// without a database.
pub fn decode_players(raw: &str) -> Loaded<Vec<Player>> {
    if let Ok(players) = serde_json::from_str::<Vec<Player>>(raw) {
        return Loaded::Current(players);
    }
    match decode_players_legacy(raw) {
        Some(players) => Loaded::Legacy(players),
        None => Loaded::Missing,
    }
}

/// Decodes a game-history payload: current schema first, then legacy
pub fn decode_recent_games(raw: &str) -> Loaded<Vec<GameRecord>> {
    if let Ok(games) = serde_json::from_str::<Vec<GameRecord>>(raw) {
        return Loaded::Current(games);
    }
    match decode_recent_games_legacy(raw) {
        Some(games) => Loaded::Legacy(games),
        None => Loaded::Missing,
    }
}

/// Decodes an all-time-totals payload: current schema first, then legacy
pub fn decode_all_time_totals(raw: &str) -> Loaded<AllTimeTotals> {
    if let Ok(totals) = serde_json::from_str::<AllTimeTotals>(raw) {
        return Loaded::Current(totals);
    }
    match decode_all_time_totals_legacy(raw) {
        Some(totals) => Loaded::Legacy(totals),
        None => Loaded::Missing,
    }
}

/// Decodes the session clock: an RFC 3339 string, or legacy epoch seconds
pub fn decode_session_started_at(raw: &str) -> Loaded<DateTime<Local>> {
    if let Ok(at) = serde_json::from_str::<DateTime<Local>>(raw) {
        return Loaded::Current(at);
    }
    match serde_json::from_str::<Value>(raw)
        .ok()
        .as_ref()
        .and_then(epoch_seconds_date)
    {
        Some(at) => Loaded::Legacy(at),
        None => Loaded::Missing,
    }
}

// The legacy encoder wrote untyped dictionaries: names are the only required
// field, scores may be absent or floats, and dates are floating-point seconds
// since the Unix epoch. Entries that cannot be salvaged are skipped, the way
// the old decoder did.

fn decode_players_legacy(raw: &str) -> Option<Vec<Player>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let items = value.as_array()?;

    let mut players = Vec::with_capacity(items.len());
    for item in items {
        let Some(name) = item.get("name").and_then(Value::as_str) else {
            continue;
        };
        players.push(Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score: loose_int(item.get("score")),
        });
    }
    Some(players)
}

fn decode_recent_games_legacy(raw: &str) -> Option<Vec<GameRecord>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let items = value.as_array()?;

    let mut games = Vec::with_capacity(items.len());
    for item in items {
        let started_at = item.get("startedAt").and_then(epoch_seconds_date);
        let ended_at = item.get("endedAt").and_then(epoch_seconds_date);
        let (Some(started_at), Some(ended_at)) = (started_at, ended_at) else {
            continue;
        };

        let entries = item
            .get("entries")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|entry| {
                        let name = entry.get("name")?.as_str()?;
                        Some(ScoreEntry {
                            id: Uuid::new_v4(),
                            name: name.to_string(),
                            score: loose_int(entry.get("score")),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        games.push(GameRecord {
            id: Uuid::new_v4(),
            started_at,
            ended_at,
            entries,
        });
    }
    Some(games)
}

fn decode_all_time_totals_legacy(raw: &str) -> Option<AllTimeTotals> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;

    let mut totals = AllTimeTotals::new();
    for (name, total) in object {
        if total.is_number() {
            totals.insert(name.clone(), loose_int(Some(total)));
        }
    }
    Some(totals)
}

fn loose_int(value: Option<&Value>) -> i64 {
    match value {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        None => 0,
    }
}

fn epoch_seconds_date(value: &Value) -> Option<DateTime<Local>> {
    let secs = value.as_f64()?;
    DateTime::from_timestamp_millis((secs * 1000.0) as i64).map(|utc| utc.with_timezone(&Local))
}
