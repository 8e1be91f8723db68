//! launchboard - Browse upcoming rocket launches
//!
//! Resolves a fresh-enough Launch Library snapshot at startup, then shows one
//! tab per launch with its mission summary and a map of the launch pad.

use std::error::Error;
use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use launchboard::app::App;
use launchboard::cli::{Cli, StartupConfig};
use launchboard::data::LaunchClient;
use launchboard::logging::{self, LogTarget};
use launchboard::store::DataStore;
use launchboard::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_launch_tabs(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Prints an error with its chain of causes
fn report(err: &dyn Error) {
    eprintln!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

fn run_tui(app: &mut App) -> io::Result<()> {
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| render_ui(f, app)) {
            break Err(e);
        }

        // Poll for keyboard events with 100ms timeout
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => app.handle_key(key),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    // Held until exit so buffered log lines are flushed
    let log_guard = if config.list_only {
        logging::init(LogTarget::Stderr)
    } else {
        logging::init(LogTarget::File(&config.cache_dir))
    };
    info!(
        cache_dir = %config.cache_dir.display(),
        selection = config.selection.name(),
        max_age_secs = config.max_age.num_seconds(),
        "launchboard starting"
    );

    let client = match &config.endpoint {
        Some(endpoint) => LaunchClient::new().with_endpoint(endpoint.clone()),
        None => LaunchClient::new(),
    };

    let store = match DataStore::initialize(&config.store_config(), &client).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to load launch data");
            report(&e);
            drop(log_guard);
            process::exit(1);
        }
    };

    if config.list_only {
        match ui::render_plain(&store, config.tab_count) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                error!(error = %e, "failed to list launches");
                report(&e);
                drop(log_guard);
                process::exit(1);
            }
        }
        return;
    }

    let mut app = App::new(store, config.tab_count);
    if let Err(e) = run_tui(&mut app) {
        error!(error = %e, "terminal error");
        report(&e);
        drop(log_guard);
        process::exit(1);
    }
}
