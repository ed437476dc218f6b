mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use pacer::{
    chunking::PhraseStarters,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    history::{HistoryEntry, HistoryLog},
    runtime::{CrosstermEventSource, FixedTicker, ReaderEvent, Runner},
    scheduler::{PacerEvent, PlaybackPhase, ReadingMode},
    Pacer,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin, Read, Write},
    path::PathBuf,
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

/// Longest the event loop sleeps when the pacer has nothing scheduled
const IDLE_REDRAW_MS: u64 = 250;

/// drift-corrected speed reading in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Paces a text one word, one bionic word, or one phrase chunk at a time at a steady words-per-minute rate."
)]
pub struct Cli {
    /// text file to read
    file: Option<PathBuf>,

    /// read this text instead of a file
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// what each step shows
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ReadingMode>,

    /// reading speed in words per minute
    #[clap(short = 'w', long)]
    wpm: Option<u32>,

    /// target number of words per chunk in chunk mode
    #[clap(short = 'c', long)]
    chunk_size: Option<usize>,

    /// split chunks into fixed-size groups instead of at phrase boundaries
    #[clap(long)]
    mechanical: bool,

    /// language of the phrase-starter list used for chunking
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// lowest allowed speed
    #[clap(long)]
    min_wpm: Option<u32>,

    /// highest allowed speed
    #[clap(long)]
    max_wpm: Option<u32>,

    /// speed change per keypress
    #[clap(long)]
    wpm_step: Option<u32>,

    /// print items to stdout instead of running the full-screen reader
    #[clap(long)]
    plain: bool,

    /// write logs to this file (the reader owns the terminal)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// use this config file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// do not record this session in the reading history
    #[clap(long)]
    no_history: bool,
}

impl Cli {
    /// Overlays command line settings on stored preferences.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        if let Some(wpm) = self.wpm {
            cfg.wpm = wpm;
        }
        if let Some(size) = self.chunk_size {
            cfg.chunk_size = size;
        }
        if self.mechanical {
            cfg.smart_chunking = false;
        }
        if let Some(language) = &self.language {
            cfg.language = language.to_lowercase();
        }
        if let Some(min) = self.min_wpm {
            cfg.min_wpm = min;
        }
        if let Some(max) = self.max_wpm {
            cfg.max_wpm = max;
        }
        if let Some(step) = self.wpm_step {
            cfg.wpm_step = step;
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn load_text(&self) -> io::Result<Option<String>> {
        if let Some(prompt) = &self.prompt {
            return Ok(Some(prompt.clone()));
        }
        if let Some(path) = &self.file {
            return fs::read_to_string(path).map(Some);
        }
        if !stdin().is_tty() {
            let mut text = String::new();
            stdin().read_to_string(&mut text)?;
            return Ok(Some(text));
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App<C: Clock = SystemClock> {
    pub pacer: Pacer<C>,
    pub events: Receiver<PacerEvent>,
    pub history: Option<HistoryLog>,
    pub show_help: bool,
    pub title: String,
    session_logged: bool,
}

impl<C: Clock> App<C> {
    pub fn new(mut pacer: Pacer<C>, title: String, history: Option<HistoryLog>) -> Self {
        let (tx, rx) = mpsc::channel();
        pacer.set_listener(Box::new(tx));

        Self {
            pacer,
            events: rx,
            history,
            show_help: false,
            title,
            session_logged: false,
        }
    }

    /// Fires due timers and handles whatever the pacer reported.
    fn on_tick(&mut self) {
        self.pacer.poll();
        self.drain_events();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if event == PacerEvent::Complete {
                self.record_session();
            }
        }
    }

    fn start(&mut self) {
        self.record_session();
        self.pacer.start();
        self.session_logged = false;
    }

    /// Logs a run in progress before an action that throws it away.
    fn end_run(&mut self) {
        self.record_session();
        self.session_logged = false;
    }

    /// Appends the current session to the history log, once per run.
    fn record_session(&mut self) {
        if self.session_logged {
            return;
        }
        let started = matches!(
            self.pacer.phase(),
            PlaybackPhase::Playing | PlaybackPhase::Paused | PlaybackPhase::Complete
        );
        if !started {
            return;
        }
        self.session_logged = true;

        if let Some(history) = &self.history {
            let entry = HistoryEntry::from_pacer(&self.pacer);
            if let Err(err) = history.append(&entry) {
                log::warn!("could not write reading history: {err}");
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char(' ') | KeyCode::Enter => match self.pacer.phase() {
                PlaybackPhase::Idle | PlaybackPhase::Complete => self.start(),
                PlaybackPhase::Playing | PlaybackPhase::Paused => self.pacer.toggle_pause(),
            },
            KeyCode::Char('s') => self.start(),
            KeyCode::Char('r') => {
                self.end_run();
                self.pacer.reset();
            }
            KeyCode::Left | KeyCode::Char('h') => self.pacer.step_back(),
            KeyCode::Right | KeyCode::Char('l') => {
                let next = self.pacer.position() as i64 + 1;
                self.pacer.set_position(next);
            }
            KeyCode::Home | KeyCode::Char('g') => self.pacer.set_position(0),
            KeyCode::End | KeyCode::Char('G') => self.pacer.set_position(i64::MAX),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('+') => self.pacer.speed_up(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('-') => self.pacer.slow_down(),
            KeyCode::Char(c @ '1'..='3') => {
                let mode = match c {
                    '1' => ReadingMode::Word,
                    '2' => ReadingMode::Bionic,
                    _ => ReadingMode::Chunk,
                };
                self.end_run();
                self.pacer.set_mode(mode);
            }
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
        self.drain_events();
        Flow::Continue
    }

    fn shutdown(&mut self) {
        self.record_session();
        self.pacer.dispose();
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let env = env_logger::Env::default().default_filter_or("info");

    if let Some(path) = &cli.log_file {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        env_logger::Builder::from_env(env)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    } else if cli.plain {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let store = cli.config_store();
    let cfg = cli.apply(store.load());

    if PhraseStarters::bundled(&cfg.language).is_none() {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            format!(
                "unknown language '{}' (available: {})",
                cfg.language,
                PhraseStarters::available().join(", ")
            ),
        )
        .exit();
    }

    if cli.save_config {
        store.save(&cfg)?;
        log::info!("saved settings to {}", store.path().display());
    }

    let Some(text) = cli.load_text()? else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "nothing to read: pass a FILE, --prompt, or pipe text on stdin",
        )
        .exit();
    };

    let title = cli
        .file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("prompt"));
    let history = if cli.no_history {
        None
    } else {
        HistoryLog::new()
    };
    let pacer = Pacer::new(cfg.session(text));

    if cli.plain {
        return run_plain(pacer);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::Io,
            "the full-screen reader needs a tty on stdin; use --plain for piped text",
        )
        .exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(pacer, title, history);
    let result = start_tui(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(IDLE_REDRAW_MS)),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step_until(app.pacer.time_until_next_timer()) {
            ReaderEvent::Tick | ReaderEvent::Resize => {}
            ReaderEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
        // steady typing must not starve the timers
        app.on_tick();
    }

    Ok(())
}

/// Prints each item on its own line at the configured pace.
fn run_plain(mut pacer: Pacer) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();

    let styled = io::stdout().is_tty();
    pacer.start();
    let mut shown = None;

    while pacer.phase() == PlaybackPhase::Playing {
        if shown != Some(pacer.position()) {
            writeln!(out, "{}", plain_line(&pacer, styled))?;
            out.flush()?;
            shown = Some(pacer.position());
        }

        if let Some(wait) = pacer.time_until_next_timer() {
            thread::sleep(wait);
        }
        pacer.poll();
    }

    let snapshot = pacer.snapshot();
    log::info!(
        "read {} items at {} wpm in {}s",
        snapshot.total_items,
        snapshot.speed_wpm,
        snapshot.elapsed_secs
    );
    pacer.dispose();
    Ok(())
}

/// Text of the current item. Bionic emphasis is an ANSI bold escape, so it
/// is only applied when `styled` (stdout is a terminal).
fn plain_line<C: Clock>(pacer: &Pacer<C>, styled: bool) -> String {
    match pacer.mode() {
        ReadingMode::Word => pacer.current_word().unwrap_or_default().to_string(),
        ReadingMode::Bionic => pacer
            .current_bionic()
            .map(|b| {
                if styled {
                    format!("{}{}", b.bold.clone().bold(), b.normal)
                } else {
                    format!("{}{}", b.bold, b.normal)
                }
            })
            .unwrap_or_default(),
        ReadingMode::Chunk => pacer
            .current_chunk()
            .map(|chunk| chunk.iter().join(" "))
            .unwrap_or_default(),
    }
}
