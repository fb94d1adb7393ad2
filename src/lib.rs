// Everything the binary needs, exposed as a library so integration tests
// can drive the app headlessly. main.rs only adds CLI parsing and terminal
// plumbing on top.
pub mod app;
pub mod app_dirs;
pub mod channel;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod prompt;
pub mod runtime;
pub mod store;
pub mod ui;
pub mod video;

use include_dir::{include_dir, Dir};

/// Embedded data banks: the channel guide and the prompt decks
pub static ASSETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Milliseconds between runtime ticks; drives the guessing-round countdown.
pub const TICK_RATE_MS: u64 = 100;
