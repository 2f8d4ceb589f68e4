//! RankBoard TUI: terminal dashboard with vim-style navigation.
//!
//! Views:
//! 1. Signals: buy/sell partitions, filtered full ranking, analyst panel
//! 2. SEPA: trend-template candidates
//! 3. Charts: price and moving-average charts with the RS line

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use rankboard_core::{ActionFilter, Config, SourceSpec, ValidationPolicy, ViewSelection};
use rankboard_tui::app::{AppState, LoadSettings};
use rankboard_tui::worker::{self, WorkerCommand};
use rankboard_tui::{input, ui};

#[derive(Parser)]
#[command(name = "rankboard-tui", about = "Terminal dashboard for ranked signal documents")]
struct Args {
    /// Config file (default: <config_dir>/rankboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document path or http(s) URL
    #[arg(long)]
    source: Option<String>,

    /// Fail the load on any validation issue
    #[arg(long)]
    strict: bool,

    /// Initial universe id
    #[arg(long)]
    universe: Option<String>,

    /// Initial view: signals, sepa or charts
    #[arg(long)]
    view: Option<ViewSelection>,

    /// Initial action filter: ALL, BUY, SELL or HOLD
    #[arg(long)]
    action: Option<ActionFilter>,
}

/// The terminal is ours, so logs go to `<data_local_dir>/rankboard/rankboard-tui.log`.
fn init_file_logging() -> Result<Option<PathBuf>> {
    let Some(dir) = dirs::data_local_dir().map(|d| d.join("rankboard")) else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log dir: {}", dir.display()))?;
    let path = dir.join("rankboard-tui.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(Some(path))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = init_file_logging()?;

    let config = Config::load(args.config.as_deref())?;
    let source = match &args.source {
        Some(location) => SourceSpec::parse(location),
        None => config.source.spec()?,
    };
    let policy = if args.strict {
        ValidationPolicy::Strict
    } else {
        config.source.policy()
    };

    let mut session = config.session.to_session();
    if let Some(universe) = &args.universe {
        session.universe.select(universe.clone());
    }
    if let Some(view) = args.view {
        session.view = view;
    }
    if let Some(action) = args.action {
        session.filter.action = action;
    }

    tracing::info!(%source, log = ?log_path, "starting terminal dashboard");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(cmd_rx, resp_tx).context("failed to spawn loader thread")?;

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        session,
        LoadSettings {
            source,
            timeout: config.source.timeout(),
            policy,
        },
    );
    app.request_load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // A load still in flight is abandoned; the worker exits once it notices.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    if !app.loading {
        let _ = worker_handle.join();
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
