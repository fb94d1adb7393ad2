use std::path::Path;

use tempfile::tempdir;

use wats::game::{GameState, DEFAULT_PLAYERS};
use wats::store::{
    Loaded, StateStore, ALL_TIME_TOTALS_KEY, PLAYERS_KEY, RECENT_GAMES_KEY, SESSION_STARTED_AT_KEY,
};

// Full evenings of play against a real on-disk store: state must survive
// process restarts, payloads written by the old client must be adopted, and
// bulk clears must be durable.

fn seed(path: &Path, key: &str, value: &str) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        rusqlite::params![key, value],
    )
    .unwrap();
}

#[test]
fn an_evening_of_games_survives_restarts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.db");

    // First run: add a player and finish a game
    {
        let store = StateStore::open_at(&path).unwrap();
        let mut state = GameState::new(Some(store), true);
        state.add_player("Ann");
        let ann = state.players.last().unwrap().id;
        state.award(9, ann);
        state.end_game();
    }

    // Second run: everything is back with scores zeroed; play another game
    {
        let store = StateStore::open_at(&path).unwrap();
        let mut state = GameState::new(Some(store), true);
        let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Host", "Guest", "Ann"]);
        assert!(state.players.iter().all(|p| p.score == 0));
        assert_eq!(state.recent_games.len(), 1);
        assert_eq!(state.all_time_totals.get("Ann"), Some(&9));

        let ann = state.players.last().unwrap().id;
        let host = state.players[0].id;
        state.award(4, ann);
        state.award(2, host);
        state.end_game();
    }

    // Third run: totals accumulated across both games
    let store = StateStore::open_at(&path).unwrap();
    let state = GameState::new(Some(store), true);
    assert_eq!(state.recent_games.len(), 2);
    assert_eq!(state.all_time_totals.get("Ann"), Some(&13));
    assert_eq!(state.all_time_totals.get("Host"), Some(&2));
    assert_eq!(state.all_time_totals.get("Guest"), Some(&0));
}

#[test]
fn legacy_payloads_from_the_old_client_are_adopted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.db");

    // Create the schema, then write payloads the way the old client did:
    // loose dictionaries, float scores, dates as epoch seconds.
    drop(StateStore::open_at(&path).unwrap());
    seed(
        &path,
        PLAYERS_KEY,
        r#"[{"name":"Ann"},{"name":"Bo","score":2.0},{"score":9}]"#,
    );
    seed(
        &path,
        RECENT_GAMES_KEY,
        r#"[{"startedAt":1700000000.0,"endedAt":1700000640.5,"entries":[{"name":"Ann","score":3},{"name":"Bo"}]}]"#,
    );
    seed(&path, ALL_TIME_TOTALS_KEY, r#"{"Ann":7.0,"Bo":1}"#);
    seed(&path, SESSION_STARTED_AT_KEY, "1700000640.5");

    let store = StateStore::open_at(&path).unwrap();
    let state = GameState::new(Some(store), false);

    // Nameless entries are dropped, missing and float scores land as ints
    let roster: Vec<(&str, i64)> = state
        .players
        .iter()
        .map(|p| (p.name.as_str(), p.score))
        .collect();
    assert_eq!(roster, vec![("Ann", 0), ("Bo", 2)]);

    assert_eq!(state.recent_games.len(), 1);
    let record = &state.recent_games[0];
    assert!(record.ended_at > record.started_at);
    assert_eq!(record.entries.len(), 2);
    assert_eq!(record.entries[0].name, "Ann");
    assert_eq!(record.entries[0].score, 3);
    assert_eq!(record.entries[1].score, 0);

    assert_eq!(state.all_time_totals.get("Ann"), Some(&7));
    assert_eq!(state.all_time_totals.get("Bo"), Some(&1));
    assert_eq!(state.session_started_at, record.ended_at);
}

#[test]
fn adopted_legacy_state_is_rewritten_in_the_current_encoding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.db");

    drop(StateStore::open_at(&path).unwrap());
    seed(
        &path,
        PLAYERS_KEY,
        r#"[{"name":"Ann"},{"name":"Bo","score":2.0}]"#,
    );

    // Any committed mutation rewrites the key in the current encoding
    {
        let store = StateStore::open_at(&path).unwrap();
        let mut state = GameState::new(Some(store), true);
        let ann = state.players[0].id;
        state.award(5, ann);
    }

    let store = StateStore::open_at(&path).unwrap();
    match store.load_players() {
        Loaded::Current(players) => {
            let roster: Vec<(&str, i64)> = players
                .iter()
                .map(|p| (p.name.as_str(), p.score))
                .collect();
            assert_eq!(roster, vec![("Ann", 5), ("Bo", 2)]);
        }
        other => panic!("expected the current encoding, got {other:?}"),
    }
}

#[test]
fn bulk_clears_are_durable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = StateStore::open_at(&path).unwrap();
        let mut state = GameState::new(Some(store), true);
        let host = state.players[0].id;
        state.award(6, host);
        state.end_game();
    }

    {
        let store = StateStore::open_at(&path).unwrap();
        let mut state = GameState::new(Some(store), true);
        assert_eq!(state.recent_games.len(), 1);
        state.reset_recent_games();
        state.clear_all_time_totals();
    }

    let store = StateStore::open_at(&path).unwrap();
    let state = GameState::new(Some(store), true);
    assert!(state.recent_games.is_empty());
    assert!(state.all_time_totals.is_empty());
    let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, DEFAULT_PLAYERS.to_vec());
}
