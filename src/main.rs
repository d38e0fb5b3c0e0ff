mod app;
mod config;
mod error;
mod event;
mod render;
mod sim;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::ScopeConfig;
use error::Result;
use event::{Event, EventHandler};

const LOG_FILE: &str = "bhscope.log";

/// Where the log may go, in order of preference. stdout and stderr belong to the TUI.
fn log_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        paths.push(dir.join(LOG_FILE));
    }
    paths.push(PathBuf::from(LOG_FILE));
    paths.push(std::env::temp_dir().join(LOG_FILE));
    paths
}

/// First candidate that can be created.
fn open_log(candidates: &[PathBuf]) -> Option<(File, PathBuf)> {
    candidates
        .iter()
        .find_map(|path| File::create(path).ok().map(|file| (file, path.clone())))
}

fn init_logging() {
    let Some((file, path)) = open_log(&log_candidates()) else {
        // Printed before the alternate screen is entered
        eprintln!("bhscope: logging disabled, could not create {LOG_FILE}");
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    info!("logging to {}", path.display());
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick(at) => app.on_tick(at),
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = ScopeConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    let mut app = App::new(&config)?;
    info!("starting: tick {} ms, {} samples per loop", config.tick_rate_ms, config.loop_resolution);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.tick_rate_ms);
    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting with {} readings logged", app.session.readings().len());
    result
}
