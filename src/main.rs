mod config;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use botlogs_api::HttpLogsClient;
use botlogs_tui::{AppState, Event, EventHandler, KeyBindings, Tui, draw};
use botlogs_view::LogView;

use config::{FileConfig, Overrides, PlatformPaths, Settings};

/// Botlogs - a terminal console for the bot admin log API
#[derive(Parser, Debug)]
#[command(name = "botlogs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the bot server (default: http://localhost:8080)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Access token sent as X-Access-Token
    #[arg(long, env = "BOTLOGS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config file (default: <config dir>/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for exports and HTML snapshots
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let paths = PlatformPaths::resolve();
    let config_path = args.config.clone().unwrap_or_else(|| paths.config_file());
    let file = FileConfig::load(&config_path)?;
    let settings = Settings::resolve(
        Overrides {
            url: args.url,
            token: args.token,
            export_dir: args.export_dir,
            debug: args.debug,
        },
        file,
        &paths,
    )?;

    init_tracing(&settings.log_level, &settings.log_file)?;
    tracing::info!(
        server = %settings.client.base_url,
        config = %config_path.display(),
        export_dir = %settings.view.export_dir.display(),
        "starting botlogs"
    );

    let result = run_app(settings).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "botlogs exited with an error");
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Send tracing output to a file; the terminal belongs to the TUI
fn init_tracing(level: &str, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("failed to open log file {}", file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(settings: Settings) -> Result<()> {
    let client = HttpLogsClient::new(settings.client).context("failed to create API client")?;

    let (view_tx, mut view_rx) = mpsc::unbounded_channel();
    let mut view = LogView::new(Arc::new(client), view_tx, settings.view);
    view.reload();
    let mut app = AppState::new(view);

    let mut tui = Tui::new().context("failed to initialise terminal")?;
    let mut events = EventHandler::new(Duration::from_millis(250));
    let keybindings = KeyBindings::new();

    tui.terminal().draw(|frame| draw(frame, &app))?;

    loop {
        let mut dirty = true;

        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        if let Some(action) = keybindings.get_action(app.key_context(), &key) {
                            tracing::trace!(?action, "key action");
                            app.update(action);
                        }
                    }
                    Event::Tick => {
                        dirty = app.view.tick();
                    }
                    Event::Resize(_, _) => {}
                    Event::Error(e) => {
                        app.view.notifications_mut().error("Terminal error", e);
                    }
                }
            }

            Some(event) = view_rx.recv() => {
                app.handle_view_event(event);
            }

            else => break,
        }

        if app.should_quit {
            break;
        }
        if dirty {
            tui.terminal().draw(|frame| draw(frame, &app))?;
        }
    }

    app.view.destroy();
    events.shutdown();
    tui.restore()?;

    tracing::info!("botlogs stopped");
    Ok(())
}
