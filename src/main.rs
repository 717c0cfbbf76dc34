use anyhow::{Context, Result};
use clap::Parser;
use hecate::api::Gateway;
use hecate::app::App;
use hecate::cli::{self, Command};
use hecate::config::Config;
use hecate::dashboard::{DashEvent, Dashboard};
use hecate::notify::StatusLine;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/hecate/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("hecate"))
}

#[derive(Parser, Debug)]
#[command(
    name = "hecate",
    version,
    about = "Terminal dashboard for subreddit ingestion and post search"
)]
struct Args {
    /// Backend base URL (overrides config file and HECATE_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Path to config file (default: ~/.config/hecate/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Log to stderr for one-shot commands; to a file while the TUI owns the terminal.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let tui_mode = args.command.is_none();
    if tui_mode {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        init_tracing(Some(&config_dir.join("hecate.log")))?;
    } else {
        init_tracing(None)?;
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }

    let timeout: Duration = config.request_timeout();
    let gateway = Gateway::new(&config.api_url, timeout)
        .with_context(|| format!("Cannot use backend URL '{}'", config.api_url))?;

    if let Some(command) = args.command {
        return cli::run(command, &gateway).await;
    }

    let (event_tx, event_rx) = mpsc::channel::<DashEvent>(32);
    let dashboard = Dashboard::new(
        gateway,
        event_tx,
        config.list_comparison,
        StatusLine::new(),
    );
    let mut app = App::new(dashboard, &config);

    hecate::ui::run(&mut app, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
