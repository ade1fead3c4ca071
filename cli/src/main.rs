mod commands;
mod table;
mod tui;

use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use taskdesk_core::config::{config_dir, API_URL_ENV};
use taskdesk_core::{ClientConfig, ReqwestGateway};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{ListCommand, TaskCommand};

const TUI_LOG_FILE: &str = "taskdesk.log";

#[derive(Parser)]
#[command(name = "taskdesk")]
#[command(about = "Manage tasks and task lists on a gestao-tarefas server", long_about = None)]
struct Cli {
    /// Backend base URL; the /gestao-tarefas service path is appended
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Log requests and responses
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create, inspect and change individual tasks
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Manage task lists and their members
    #[command(subcommand)]
    Lists(ListCommand),
    /// Open the Terminal User Interface
    Tui,
}

fn init_tracing(verbose: bool, tui_mode: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("taskdesk=debug,warn")
        } else {
            EnvFilter::new("taskdesk=info,warn")
        }
    });

    if tui_mode {
        // stderr would draw over the alternate screen.
        let path = config_dir(None)?.join(TUI_LOG_FILE);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));
    init_tracing(cli.verbose, tui_mode)?;

    let config = ClientConfig::load(None, cli.api_url.as_deref())?;
    let gateway = ReqwestGateway::new(&config)?;
    info!(base_url = %config.base_url, "using backend");

    match cli.command {
        Some(Commands::Tasks(command)) => commands::run_tasks(command, gateway).await,
        Some(Commands::Lists(command)) => commands::run_lists(command, gateway).await,
        Some(Commands::Tui) | None => tui::run(gateway).await,
    }
}
