use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StateStore;
use crate::TICK_RATE_MS;

/// Names seeded on first run. These players can never be removed from the roster.
pub const DEFAULT_PLAYERS: [&str; 2] = ["Host", "Guest"];

pub type PlayerId = Uuid;

/// A member of the current roster. The id is a runtime-only handle (it is not
/// persisted), so value equality is name + score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.score == other.score
    }
}

/// Immutable snapshot of one player's score at the moment a game ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub score: i64,
}

impl PartialEq for ScoreEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.score == other.score
    }
}

/// One completed game session. Append-only; never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub entries: Vec<ScoreEntry>,
}

impl PartialEq for GameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.started_at == other.started_at
            && self.ended_at == other.ended_at
            && self.entries == other.entries
    }
}

/// Cumulative score per player name across completed games
pub type AllTimeTotals = BTreeMap<String, i64>;

/// In-memory guessing-round countdown. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Round {
    pub seconds_remaining: f64,
    pub length_secs: f64,
}

/// Which slice of state a mutation touched; sent to subscribers after every commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Roster,
    Scores,
    History,
    Totals,
    SessionClock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    EmptyName,
    DuplicateName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    UnknownId,
    ProtectedName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AwardOutcome {
    Awarded,
    UnknownId,
}

/// The whole session/scoring state: roster with live scores, finished-game
/// history, the all-time totals, and the clock for the game in progress.
///
/// Every mutation saves the touched collection through the store (when one is
/// attached) before returning, and then tells subscribers what changed. Store
/// failures are absorbed; the previous durable value stays on disk.
#[derive(Debug)]
pub struct GameState {
    pub players: Vec<Player>,
    pub recent_games: Vec<GameRecord>,
    pub all_time_totals: AllTimeTotals,
    pub session_started_at: DateTime<Local>,
    pub round: Option<Round>,
    store: Option<StateStore>,
    listeners: Vec<Sender<StateChange>>,
}

impl GameState {
    /// Restores state from the store, or bootstraps the default roster when the
    /// store is absent, empty, or undecodable. With `reset_clock_daily` the
    /// session clock is corrected to "now" unless the stored value is from the
    /// current calendar day.
    pub fn new(store: Option<StateStore>, reset_clock_daily: bool) -> Self {
        let mut state = Self {
            players: vec![],
            recent_games: vec![],
            all_time_totals: AllTimeTotals::new(),
            session_started_at: Local::now(),
            round: None,
            store,
            listeners: vec![],
        };
        state.restore(reset_clock_daily);
        state
    }

    fn restore(&mut self, reset_clock_daily: bool) {
        let Some(store) = &self.store else {
            self.players = DEFAULT_PLAYERS.iter().map(|&n| Player::new(n)).collect();
            return;
        };

        match store.load_players().into_option() {
            Some(players) if !players.is_empty() => self.players = players,
            // First run, or nothing usable on disk: seed and persist right away
            _ => {
                self.players = DEFAULT_PLAYERS.iter().map(|&n| Player::new(n)).collect();
                let _ = store.save_players(&self.players);
            }
        }

        if let Some(games) = store.load_recent_games().into_option() {
            self.recent_games = games;
        }
        if let Some(totals) = store.load_all_time_totals().into_option() {
            self.all_time_totals = totals;
        }

        match store.load_session_started_at().into_option() {
            Some(at) if !reset_clock_daily || at.date_naive() == Local::now().date_naive() => {
                self.session_started_at = at;
            }
            _ => {
                self.session_started_at = Local::now();
                let _ = store.save_session_started_at(self.session_started_at);
            }
        }
    }

    /// Adds a player with score 0 to the end of the roster. The name is
    /// trimmed first; empty and case-insensitive duplicate names are rejected.
    pub fn add_player(&mut self, name: &str) -> AddOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return AddOutcome::EmptyName;
        }
        let lowered = trimmed.to_lowercase();
        if self
            .players
            .iter()
            .any(|p| p.name.to_lowercase() == lowered)
        {
            return AddOutcome::DuplicateName;
        }

        self.players.push(Player::new(trimmed));
        self.persist_players();
        self.notify(StateChange::Roster);
        AddOutcome::Added
    }

    /// Removes a player from the roster. Unknown ids and the default players
    /// are left alone.
    pub fn remove_player(&mut self, id: PlayerId) -> RemoveOutcome {
        let Some(idx) = self.players.iter().position(|p| p.id == id) else {
            return RemoveOutcome::UnknownId;
        };
        if DEFAULT_PLAYERS.contains(&self.players[idx].name.as_str()) {
            return RemoveOutcome::ProtectedName;
        }

        self.players.remove(idx);
        self.persist_players();
        self.notify(StateChange::Roster);
        RemoveOutcome::Removed
    }

    /// Adds `points` to one player's live score. Any integer is accepted,
    /// including negative; scores are never clamped.
    pub fn award(&mut self, points: i64, id: PlayerId) -> AwardOutcome {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return AwardOutcome::UnknownId;
        };

        player.score += points;
        self.persist_players();
        self.notify(StateChange::Scores);
        AwardOutcome::Awarded
    }

    /// Ends the game in progress: snapshots every roster player into a new
    /// history record, rolls the snapshot into the all-time totals, zeroes the
    /// live scores, and starts the next session clock. Each collection is
    /// saved right after it changes. A new game is immediately in progress
    /// when this returns.
    pub fn end_game(&mut self) {
        let ended_at = Local::now();
        let entries: Vec<ScoreEntry> = self
            .players
            .iter()
            .map(|p| ScoreEntry {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect();

        self.recent_games.push(GameRecord {
            id: Uuid::new_v4(),
            started_at: self.session_started_at,
            ended_at,
            entries: entries.clone(),
        });
        self.persist_recent_games();
        self.notify(StateChange::History);

        for entry in &entries {
            *self.all_time_totals.entry(entry.name.clone()).or_insert(0) += entry.score;
        }
        self.persist_all_time_totals();
        self.notify(StateChange::Totals);

        for player in &mut self.players {
            player.score = 0;
        }
        self.persist_players();
        self.notify(StateChange::Scores);

        self.session_started_at = ended_at;
        self.persist_session_started_at();
        self.notify(StateChange::SessionClock);
    }

    /// Empties the finished-game history. Roster and live scores are untouched.
    pub fn reset_recent_games(&mut self) {
        self.recent_games.clear();
        self.persist_recent_games();
        self.notify(StateChange::History);
    }

    /// Empties the all-time totals. Roster and live scores are untouched.
    pub fn clear_all_time_totals(&mut self) {
        self.all_time_totals.clear();
        self.persist_all_time_totals();
        self.notify(StateChange::Totals);
    }

    pub fn start_round(&mut self, length_secs: f64) {
        self.round = Some(Round {
            seconds_remaining: length_secs,
            length_secs,
        });
    }

    pub fn end_round(&mut self) {
        self.round = None;
    }

    pub fn round_active(&self) -> bool {
        self.round.is_some()
    }

    pub fn on_tick(&mut self) {
        if let Some(round) = &mut self.round {
            round.seconds_remaining -= TICK_RATE_MS as f64 / 1000_f64;
            if round.seconds_remaining <= 0.0 {
                self.round = None;
            }
        }
    }

    /// Registers an observer. Every committed mutation is reported on the
    /// returned channel; dropped receivers are pruned on the next send.
    pub fn subscribe(&mut self) -> Receiver<StateChange> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    fn notify(&mut self, change: StateChange) {
        self.listeners.retain(|tx| tx.send(change).is_ok());
    }

    fn persist_players(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_players(&self.players);
        }
    }

    fn persist_recent_games(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_recent_games(&self.recent_games);
        }
    }

    fn persist_all_time_totals(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_all_time_totals(&self.all_time_totals);
        }
    }

    fn persist_session_started_at(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_session_started_at(self.session_started_at);
        }
    }
}
