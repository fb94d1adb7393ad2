use std::sync::mpsc::Receiver;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::channel::ChannelGuide;
use crate::game::{AddOutcome, GameState, PlayerId, StateChange};
use crate::prompt::{Category, Prompt, PromptDeck};
use crate::video::VideoPlayer;

/// Which panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Live,
    Roster,
    History,
    Leaderboard,
    Channels,
}

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Top-level application state: the scoring core plus everything the
/// terminal UI needs around it (focus, selections, the channel guide, the
/// prompt deck, and the playback handle).
pub struct App {
    pub game: GameState,
    pub screen: Screen,
    pub guide: ChannelGuide,
    pub deck: PromptDeck,
    pub category: Category,
    pub prompt: Option<Prompt>,
    pub selected_player: usize,
    pub selected_channel: usize,
    pub tuned_channel: usize,
    pub history_scroll: usize,
    pub name_input: String,
    pub paused: bool,
    pub round_secs: u64,
    video: Box<dyn VideoPlayer>,
}

impl App {
    pub fn new(
        game: GameState,
        guide: ChannelGuide,
        deck: PromptDeck,
        video: Box<dyn VideoPlayer>,
        category: Category,
        round_secs: u64,
    ) -> Self {
        Self {
            game,
            screen: Screen::Live,
            guide,
            deck,
            category,
            prompt: None,
            selected_player: 0,
            selected_channel: 0,
            tuned_channel: 0,
            history_scroll: 0,
            name_input: String::new(),
            paused: false,
            round_secs,
            video,
        }
    }

    /// Starts playback of the guide channel at `idx`
    pub fn tune(&mut self, idx: usize) {
        if let Some(channel) = self.guide.channels().get(idx) {
            self.tuned_channel = idx;
            self.paused = false;
            self.video.select_channel(channel);
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.paused {
            self.video.play();
        } else {
            self.video.pause();
        }
        self.paused = !self.paused;
    }

    pub fn draw_prompt(&mut self) {
        self.prompt = Some(self.deck.draw(self.category));
    }

    pub fn on_tick(&mut self) {
        self.game.on_tick();
    }

    pub fn subscribe_changes(&mut self) -> Receiver<StateChange> {
        self.game.subscribe()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.screen {
            Screen::Live => self.handle_live_key(key),
            Screen::Roster => self.handle_roster_key(key),
            Screen::History => self.handle_history_key(key),
            Screen::Leaderboard => self.handle_leaderboard_key(key),
            Screen::Channels => self.handle_channels_key(key),
        }
    }

    fn handle_live_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Up => self.selected_player = self.selected_player.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_player + 1 < self.game.players.len() {
                    self.selected_player += 1;
                }
            }
            KeyCode::Char('1') => self.award_selected(1),
            KeyCode::Char('3') => self.award_selected(3),
            KeyCode::Char('5') => self.award_selected(5),
            KeyCode::Char('p') => self.draw_prompt(),
            KeyCode::Char('t') => {
                if self.game.round_active() {
                    self.game.end_round();
                } else {
                    self.game.start_round(self.round_secs as f64);
                }
            }
            KeyCode::Char('e') => self.game.end_game(),
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Char('r') => self.screen = Screen::Roster,
            KeyCode::Char('h') => self.screen = Screen::History,
            KeyCode::Char('l') => self.screen = Screen::Leaderboard,
            KeyCode::Char('c') => {
                self.selected_channel = self.tuned_channel;
                self.screen = Screen::Channels;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_roster_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => {
                self.name_input.clear();
                self.screen = Screen::Live;
            }
            KeyCode::Enter => {
                // Rejected names stay in the input so they can be fixed
                if self.game.add_player(&self.name_input) == AddOutcome::Added {
                    self.name_input.clear();
                }
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Up => self.selected_player = self.selected_player.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_player + 1 < self.game.players.len() {
                    self.selected_player += 1;
                }
            }
            KeyCode::Delete => {
                if let Some(id) = self.selected_player_id() {
                    let _ = self.game.remove_player(id);
                    self.clamp_player_selection();
                }
            }
            KeyCode::Char(c) => self.name_input.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Live,
            KeyCode::Up => self.history_scroll = self.history_scroll.saturating_sub(1),
            // Clamped against the list length at render time
            KeyCode::Down => self.history_scroll += 1,
            KeyCode::Char('x') => {
                self.game.reset_recent_games();
                self.history_scroll = 0;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Live,
            KeyCode::Char('x') => self.game.clear_all_time_totals(),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_channels_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Live,
            KeyCode::Up => self.selected_channel = self.selected_channel.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_channel + 1 < self.guide.channels().len() {
                    self.selected_channel += 1;
                }
            }
            KeyCode::Enter => {
                self.tune(self.selected_channel);
                self.screen = Screen::Live;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn award_selected(&mut self, points: i64) {
        if let Some(id) = self.selected_player_id() {
            let _ = self.game.award(points, id);
        }
    }

    fn selected_player_id(&self) -> Option<PlayerId> {
        self.game.players.get(self.selected_player).map(|p| p.id)
    }

    fn clamp_player_selection(&mut self) {
        if self.selected_player >= self.game.players.len() {
            self.selected_player = self.game.players.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::video::NullPlayer;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingPlayer {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl VideoPlayer for RecordingPlayer {
        fn select_channel(&mut self, channel: &Channel) {
            self.log.borrow_mut().push(format!("select {}", channel.name));
        }
        fn play(&mut self) {
            self.log.borrow_mut().push("play".into());
        }
        fn pause(&mut self) {
            self.log.borrow_mut().push("pause".into());
        }
    }

    fn test_app() -> App {
        App::new(
            GameState::new(None, true),
            ChannelGuide::builtin(),
            PromptDeck::builtin(),
            Box::new(NullPlayer),
            Category::Misc,
            90,
        )
    }

    fn recording_app() -> (App, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let app = App::new(
            GameState::new(None, true),
            ChannelGuide::builtin(),
            PromptDeck::builtin(),
            Box::new(RecordingPlayer { log: log.clone() }),
            Category::Misc,
            90,
        );
        (app, log)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for &code in codes {
            app.handle_key(key(code));
        }
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn award_keys_score_the_selected_player() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Down, KeyCode::Char('3')]);
        assert_eq!(app.game.players[1].score, 3);

        press(&mut app, &[KeyCode::Char('5')]);
        assert_eq!(app.game.players[1].score, 8);
        assert_eq!(app.game.players[0].score, 0);
    }

    #[test]
    fn player_selection_stays_within_the_roster() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected_player, 0);

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.selected_player, app.game.players.len() - 1);
    }

    #[test]
    fn roster_screen_adds_typed_player() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.screen, Screen::Roster);

        type_str(&mut app, "Ann");
        press(&mut app, &[KeyCode::Enter]);

        assert!(app.game.players.iter().any(|p| p.name == "Ann"));
        assert!(app.name_input.is_empty());

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.screen, Screen::Live);
    }

    #[test]
    fn rejected_add_keeps_the_input_for_fixing() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('r')]);
        type_str(&mut app, "host");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(app.name_input, "host");
        assert_eq!(app.game.players.len(), 2);
    }

    #[test]
    fn backspace_edits_the_name_input() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('r')]);
        type_str(&mut app, "Annn");
        press(&mut app, &[KeyCode::Backspace]);
        assert_eq!(app.name_input, "Ann");
    }

    #[test]
    fn delete_removes_the_selected_unprotected_player() {
        let mut app = test_app();
        app.game.add_player("Ann");
        press(&mut app, &[KeyCode::Char('r')]);
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Delete]);

        assert!(app.game.players.iter().all(|p| p.name != "Ann"));
        // Selection falls back onto the last remaining player
        assert_eq!(app.selected_player, 1);
    }

    #[test]
    fn delete_on_a_protected_player_is_a_noop() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('r'), KeyCode::Delete]);
        assert_eq!(app.game.players.len(), 2);
    }

    #[test]
    fn end_game_key_snapshots_and_resets() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('e')]);

        assert_eq!(app.game.recent_games.len(), 1);
        assert_eq!(app.game.recent_games[0].entries[0].score, 3);
        assert!(app.game.players.iter().all(|p| p.score == 0));
        assert_eq!(app.game.all_time_totals.get("Host"), Some(&3));
    }

    #[test]
    fn round_key_toggles_the_countdown() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('t')]);
        assert!(app.game.round_active());
        assert_eq!(app.game.round.unwrap().length_secs, 90.0);

        press(&mut app, &[KeyCode::Char('t')]);
        assert!(!app.game.round_active());
    }

    #[test]
    fn ticks_run_the_round_down() {
        let mut app = test_app();
        app.round_secs = 1;
        press(&mut app, &[KeyCode::Char('t')]);

        // 11 ticks at 100ms pass the 1s round
        for _ in 0..11 {
            app.on_tick();
        }
        assert!(!app.game.round_active());
    }

    #[test]
    fn prompt_key_draws_from_the_configured_category() {
        let mut app = test_app();
        app.category = Category::Kitchen;
        assert!(app.prompt.is_none());

        press(&mut app, &[KeyCode::Char('p')]);
        let prompt = app.prompt.as_ref().unwrap();
        assert!(!prompt.text.is_empty());
        assert!(matches!(prompt.category, Category::Kitchen));
    }

    #[test]
    fn space_toggles_playback() {
        let (mut app, log) = recording_app();
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.paused);
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(!app.paused);
        assert_eq!(log.borrow().as_slice(), ["pause", "play"]);
    }

    #[test]
    fn channels_screen_tunes_the_selected_channel() {
        let (mut app, log) = recording_app();
        app.tune(0);
        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.screen, Screen::Channels);
        assert_eq!(app.selected_channel, 0);

        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.screen, Screen::Live);
        assert_eq!(app.tuned_channel, 1);

        let expected_second = app.guide.channels()[1].name.clone();
        assert_eq!(
            log.borrow().last().unwrap(),
            &format!("select {}", expected_second)
        );
    }

    #[test]
    fn tune_out_of_range_is_a_noop() {
        let (mut app, log) = recording_app();
        app.tune(999);
        assert!(log.borrow().is_empty());
        assert_eq!(app.tuned_channel, 0);
    }

    #[test]
    fn esc_leaves_subscreens_then_quits_from_live() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('h')]);
        assert_eq!(app.screen, Screen::History);

        assert_eq!(app.handle_key(key(KeyCode::Esc)), Flow::Continue);
        assert_eq!(app.screen, Screen::Live);

        assert_eq!(app.handle_key(key(KeyCode::Esc)), Flow::Quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('r')]);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Flow::Quit);
        // And the 'c' never leaked into the name input
        assert!(app.name_input.is_empty());
    }

    #[test]
    fn history_screen_scrolls_and_clears() {
        let mut app = test_app();
        app.game.end_game();
        app.game.end_game();

        press(&mut app, &[KeyCode::Char('h'), KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.history_scroll, 2);
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.history_scroll, 1);

        press(&mut app, &[KeyCode::Char('x')]);
        assert!(app.game.recent_games.is_empty());
        assert_eq!(app.history_scroll, 0);
    }

    #[test]
    fn leaderboard_screen_clears_totals() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('e')]);
        assert!(!app.game.all_time_totals.is_empty());

        press(&mut app, &[KeyCode::Char('l'), KeyCode::Char('x')]);
        assert!(app.game.all_time_totals.is_empty());
        assert_eq!(app.screen, Screen::Leaderboard);
    }
}
