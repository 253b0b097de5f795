//! Bodhi Sample TUI Entry Point
//!
//! Launches the terminal harness against a Bodhi server.
//!
//! Usage:
//!   bodhi-sample-tui [OPTIONS]
//!
//! Required settings come from the config file, the `BODHI_*` environment
//! or the flags below, in increasing order of precedence.
//!
//! Logs go to `BODHI_LOG_FILE` (default: `bodhi-sample-tui.log` in the temp
//! directory) so they never draw over the screen.

use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use harness_core::{load_config, AppConfig, ConfigOverrides, Harness, HttpClient, ProviderConfig};
use harness_tui::App;

const DEFAULT_LOG_FILE: &str = "bodhi-sample-tui.log";

#[derive(Parser, Debug)]
#[command(name = "bodhi-sample-tui")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, env = "BODHI_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bodhi API server URL
    #[arg(short = 's', long, value_name = "URL")]
    server_url: Option<String>,

    /// Pre-provisioned bearer token used by login
    #[arg(long, value_name = "TOKEN")]
    access_token: Option<String>,

    /// Client log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path
    #[arg(long, env = "BODHI_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            server_url: self.server_url.clone(),
            access_token: self.access_token.clone(),
            log_level: self.log_level.clone(),
            ..ConfigOverrides::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.overrides())
        .context("failed to load configuration")?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE));
    init_logging(&log_path, &config)?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: bodhi-sample-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with -t.");
        std::process::exit(1);
    }

    let client = Arc::new(HttpClient::from_config(&config).context("failed to build client")?);
    let harness = Harness::new(client, ProviderConfig::from(&config));
    info!(server = %config.server_url, redirect_uri = %config.redirect_uri(), "Starting TUI");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(harness);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// File logging; `RUST_LOG` wins over the configured level
fn init_logging(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "harness_core={level},harness_tui={level},bodhi_sample_tui={level}",
            level = config.log_level
        ))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();
    Ok(())
}
