pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fmt,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use trainclock::{
    app_dirs::AppDirs,
    audio,
    catalog::{Catalog, SessionLoader},
    config::{Config, ConfigStore, FileConfigStore},
    controller::{Command, SessionController},
    error::PlaybackError,
    logging, report,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::Session,
};
use tracing_appender::non_blocking::WorkerGuard;

/// training session countdown for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Plays a shared training session as a step-by-step countdown: start, pause, reset and move between exercises, with a bell when each one ends."
)]
pub struct Cli {
    /// share id of the training to play (defaults to the configured one)
    share_id: Option<String>,

    /// list the available trainings and exit
    #[clap(long)]
    list: bool,

    /// print the training's exercises, times and category breakdown, then exit
    #[clap(long)]
    summary: bool,

    /// do not ring the bell when an exercise ends
    #[clap(long)]
    no_sound: bool,

    /// seconds the "exercise completed" notice stays on screen
    #[clap(long)]
    alert_secs: Option<u64>,

    /// catalog JSON file to use instead of the bundled trainings
    #[clap(long)]
    catalog: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags take precedence over the stored config
    fn merge_into(&self, mut config: Config) -> Config {
        if self.no_sound {
            config.sound = false;
        }
        if let Some(secs) = self.alert_secs {
            config.alert_secs = secs;
        }
        if let Some(path) = &self.catalog {
            config.catalog_path = Some(path.clone());
        }
        if let Some(share_id) = &self.share_id {
            config.default_share_id = share_id.clone();
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Quit,
}

pub struct App {
    pub controller: SessionController,
    /// Highlighted row in the step list
    pub cursor: usize,
    /// Last rejected command, shown in the status line
    pub notice: Option<String>,
}

impl App {
    pub fn new(session: Session, config: &Config) -> Result<Self, PlaybackError> {
        let controller = SessionController::new(session)?
            .with_audio(audio::cue_for(config.sound))
            .with_alert_delay(Duration::from_secs(config.alert_secs));

        Ok(Self {
            controller,
            cursor: 0,
            notice: None,
        })
    }

    fn command_for(&self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char(' ') => Some(Command::Toggle),
            // on the completion screen `r` starts over
            KeyCode::Char('r') if self.controller.is_completed() => Some(Command::Restart),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('n') | KeyCode::Right => Some(Command::Next),
            KeyCode::Char('p') | KeyCode::Left => Some(Command::Previous),
            KeyCode::Enter => Some(Command::Select(self.cursor)),
            KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Command::Select(d as usize - 1)),
            _ => None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyAction::Quit,
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                return KeyAction::Continue;
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.controller.session().len() {
                    self.cursor += 1;
                }
                return KeyAction::Continue;
            }
            _ => {}
        }

        if let Some(command) = self.command_for(key) {
            match self.controller.apply(command) {
                Ok(snapshot) => {
                    self.notice = None;
                    self.cursor = snapshot.current_step_index;
                }
                Err(e) => self.notice = Some(e.to_string()),
            }
        }
        KeyAction::Continue
    }

    /// Applies due countdown ticks and expires the completion notice
    fn on_wakeup(&mut self, now: Instant) {
        self.controller.advance_time(now);
        self.controller.update_alert(now);
    }
}

/// Exits with a clap-formatted error, flushing buffered log events first
fn exit_with(
    log_guard: Option<WorkerGuard>,
    kind: ErrorKind,
    message: impl fmt::Display,
) -> ! {
    drop(log_guard);
    Cli::command().error(kind, message).exit()
}

/// Makes the training just played the default for the next run. Only the
/// stored config is written back; one-off command-line flags are not.
fn remember_last_played<S: ConfigStore>(
    store: &S,
    stored: &Config,
    share_id: &str,
) -> io::Result<()> {
    if stored.default_share_id == share_id {
        return Ok(());
    }
    let updated = Config {
        default_share_id: share_id.to_string(),
        ..stored.clone()
    };
    store.save(&updated)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logging is best-effort: a read-only home must not stop playback
    let log_guard = AppDirs::state_dir().and_then(|dir| logging::init(&dir).ok());

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.merge_into(stored.clone());

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::seeded()?,
    };

    if cli.list {
        println!("{}", report::training_list(&catalog));
        return Ok(());
    }

    let share_id = config.default_share_id.clone();

    if cli.summary {
        match report::training_summary(&catalog, &share_id) {
            Ok(summary) => println!("{}", summary),
            Err(e) => exit_with(log_guard, ErrorKind::InvalidValue, e),
        }
        return Ok(());
    }

    let session = match catalog.load(&share_id) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("cannot play {}: {}", share_id, e);
            exit_with(log_guard, ErrorKind::InvalidValue, e)
        }
    };

    if !stdin().is_tty() {
        exit_with(log_guard, ErrorKind::Io, "stdin must be a tty");
    }

    let mut app = App::new(session, &config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(config.redraw_ms.max(10))),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if result.is_ok() {
        if let Err(e) = remember_last_played(&store, &stored, &share_id) {
            tracing::warn!("cannot save config to {:?}: {}", store.path(), e);
        }
    }

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    tracing::info!("playing '{}'", app.controller.session().title);
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step_until(app.controller.time_until_tick(Instant::now()));

        if let AppEvent::Key(key) = event {
            if key.kind == KeyEventKind::Press && app.on_key(key) == KeyAction::Quit {
                break;
            }
        }

        // Every wake-up, keyed or not, collects due ticks
        app.on_wakeup(Instant::now());
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
