use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use wats::{
    app::{App, Flow},
    channel::ChannelGuide,
    config::{Config, ConfigStore, FileConfigStore},
    game::{GameRecord, GameState},
    prompt::{Category, PromptDeck},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    store::StateStore,
    video::{ExternalPlayer, NullPlayer, VideoPlayer},
    TICK_RATE_MS,
};

/// tv-party scoreboard for home-shopping live streams
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A tv-party scoreboard TUI: tune a home-shopping stream, hand out points while everyone guesses what they are selling, and keep game history and all-time totals between evenings."
)]
pub struct Cli {
    /// channel to tune on startup (guide name, case-insensitive)
    #[clap(short = 'c', long)]
    channel: Option<String>,

    /// prompt category to draw from
    #[clap(long, value_enum, default_value_t = Category::Misc)]
    category: Category,

    /// external player command; the stream url is appended
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// run without a video player
    #[clap(long)]
    no_video: bool,

    /// guessing-round length in seconds
    #[clap(short = 'r', long)]
    round_secs: Option<u64>,

    /// directory for the state database (defaults to the platform state dir)
    #[clap(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// print the channel guide and exit
    #[clap(long)]
    list_channels: bool,

    /// write the finished-game history to a csv file and exit
    #[clap(long, value_name = "FILE")]
    export_games: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = config_from(&cli, FileConfigStore::default().load());
    let guide = ChannelGuide::with_extras(&config.extra_channels);

    if cli.list_channels {
        for channel in guide.channels() {
            println!("{}  {}", channel.name, channel.url);
        }
        return Ok(());
    }

    if let Some(path) = &cli.export_games {
        let store = open_store(cli.data_dir.as_deref())?;
        let games = store.load_recent_games().into_option().unwrap_or_default();
        export_games_csv(path, &games)?;
        println!("wrote {} games to {}", games.len(), path.display());
        return Ok(());
    }

    let start_channel = match &cli.channel {
        Some(name) => match guide.position(name) {
            Some(idx) => idx,
            None => {
                let mut cmd = Cli::command();
                cmd.error(
                    ErrorKind::InvalidValue,
                    format!("channel {name:?} is not in the guide; try --list-channels"),
                )
                .exit();
            }
        },
        None => 0,
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = open_store(cli.data_dir.as_deref())?;
    let game = GameState::new(Some(store), config.reset_clock_daily);

    let video: Box<dyn VideoPlayer> = if cli.no_video {
        Box::new(NullPlayer)
    } else {
        Box::new(ExternalPlayer::new(config.player_cmd.clone()))
    };

    let mut app = App::new(
        game,
        guide,
        PromptDeck::builtin(),
        video,
        cli.category,
        config.round_secs,
    );
    app.tune(start_channel);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_tui(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Config-file values overridden by whatever was given on the command line
fn config_from(cli: &Cli, mut config: Config) -> Config {
    if let Some(round_secs) = cli.round_secs {
        config.round_secs = round_secs;
    }
    if cli.player.is_some() {
        config.player_cmd = cli.player.clone();
    }
    config
}

fn open_store(data_dir: Option<&Path>) -> Result<StateStore, rusqlite::Error> {
    match data_dir {
        Some(dir) => StateStore::open_at(dir.join("state.db")),
        None => StateStore::open(),
    }
}

fn export_games_csv(path: &Path, games: &[GameRecord]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["game", "started_at", "ended_at", "player", "score"])?;
    for (idx, game) in games.iter().enumerate() {
        for entry in &game.entries {
            wtr.write_record([
                (idx + 1).to_string(),
                game.started_at.to_rfc3339(),
                game.ended_at.to_rfc3339(),
                entry.name.clone(),
                entry.score.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn run_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let changes = app.subscribe_changes();
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                // Capture before the tick so the countdown's expiring frame
                // still gets drawn
                let was_ticking = app.game.round_active();
                app.on_tick();
                let dirty = changes.try_iter().count() > 0;
                if was_ticking || dirty {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
                let _ = changes.try_iter().count();
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
