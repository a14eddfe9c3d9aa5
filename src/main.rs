use std::{
    error::Error,
    io::{self, stdout, Write},
    ops::RangeInclusive,
    path::PathBuf,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flashread::{
    app::{App, KeyOutcome},
    config::{FileSettingsStore, SettingsStore},
    logging,
    runtime::{CrosstermEventSource, FlashEvent, Runner},
    selection::{parse_line_range, FileSelection, SelectionSource, StdinSelection, TextSelection},
    FlushMode, Session,
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

const POLL_INTERVAL_MS: u64 = 250;

/// flash through text a few words at a time at a fixed reading speed
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads text from a file, --text or piped stdin and flashes it in fixed-size word groups, one group per interval, so your eyes never have to move."
)]
pub struct Cli {
    /// file to read; piped stdin is used when neither FILE nor --text is given
    file: Option<PathBuf>,

    /// read this text instead of a file
    #[clap(short = 't', long, conflicts_with = "file")]
    text: Option<String>,

    /// only read these lines of FILE, e.g. 10:20, 10: or 10
    #[clap(long, value_parser = parse_line_range, requires = "file")]
    lines: Option<RangeInclusive<usize>>,

    /// reading speed in words per minute [saved default: 600]
    #[clap(short = 'w', long)]
    wpm: Option<String>,

    /// number of words per flash [saved default: 1]
    #[clap(short = 'c', long = "word-count")]
    word_count: Option<String>,

    /// what happens to the word that finds a flash already full
    #[clap(long, value_enum, default_value_t = FlushMode::Drop)]
    flush_mode: FlushMode,

    /// store --wpm and --word-count as the new defaults
    #[clap(long)]
    save: bool,

    /// settings file to use instead of the platform config dir
    #[clap(long)]
    config: Option<PathBuf>,

    /// print every flash on its own line and exit
    #[clap(long)]
    dump: bool,
}

impl Cli {
    fn selection_source(&self) -> Box<dyn SelectionSource> {
        match (&self.text, &self.file) {
            (Some(text), _) => Box::new(TextSelection(text.clone())),
            (None, Some(path)) => {
                let selection = FileSelection::new(path);
                match &self.lines {
                    Some(lines) => Box::new(selection.with_lines(lines.clone())),
                    None => Box::new(selection),
                }
            }
            (None, None) => Box::new(StdinSelection),
        }
    }

    fn settings_store(&self) -> FileSettingsStore {
        match &self.config {
            Some(path) => FileSettingsStore::with_path(path),
            None => FileSettingsStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let store = cli.settings_store();
    let settings = store
        .load()
        .with_overrides(cli.wpm.clone(), cli.word_count.clone());

    if cli.save {
        store.save(&settings)?;
        info!("saved settings to {}", store.path().display());
    }

    let config = match settings.to_session_config(cli.flush_mode) {
        Ok(config) => config,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    let text = cli.selection_source().selection();
    let session = Session::new(text.as_deref(), config)?;

    if cli.dump {
        return dump(&session);
    }

    if !stdout().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::Io,
            "stdout must be a tty (use --dump to print flashes instead)",
        )
        .exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = start_tui(&mut terminal, &mut app);
    app.close();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn dump(session: &Session) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    for flash in session.player().flashes() {
        writeln!(out, "{}", flash.text().trim())?;
    }
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    app.start(runner.sender());

    loop {
        let Some(event) = runner.step() else {
            continue;
        };

        match event {
            FlashEvent::Tick(generation) => {
                if !app.on_tick(generation) {
                    continue;
                }
            }
            FlashEvent::Resize => {}
            FlashEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key, runner.sender()) == KeyOutcome::Quit {
                    break;
                }
            }
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
