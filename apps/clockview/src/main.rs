use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Coordinate, HttpClockService, InteractionController, NotificationCenter, OperationError,
};
use shared::domain::ProcessId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::load_settings;
use render::{alert_line, clock_diagram, process_table};

#[derive(Parser, Debug)]
#[command(name = "clockview", about = "Drive and inspect a Lamport clock service")]
struct Cli {
    /// Config file; defaults to ./clockview.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Service base url including the /api/v1 prefix.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    alert_ttl_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List processes with their current logical clocks.
    Processes,
    CreateProcess {
        name: String,
    },
    /// Record an internal event on a process.
    Event {
        process_id: i64,
    },
    Send {
        source: i64,
        destination: i64,
        message: String,
    },
    /// Draw the logical-clock diagram.
    Timeline,
    /// Describe the event plotted at (clock, process).
    Describe {
        x: u64,
        y: i64,
    },
    /// Interactive session (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(ttl) = cli.alert_ttl_ms {
        settings.alert_ttl_ms = ttl;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let service = HttpClockService::with_timeout(&settings.api_base_url, settings.request_timeout())
        .with_context(|| format!("cannot use service url '{}'", settings.api_base_url))?;
    info!(api = %service.base_url(), "using clock service");
    let controller = Arc::new(InteractionController::new(
        Arc::new(service),
        NotificationCenter::new(settings.alert_ttl()),
    ));

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(controller).await?,
        Command::Processes => {
            let outcome = controller.refresh_processes().await;
            report(&controller, outcome)?;
            let processes = controller.processes().await;
            let selection = controller.selection().await;
            print!("{}", process_table(&processes, selection));
        }
        Command::CreateProcess { name } => {
            let outcome = controller.create_process(&name).await;
            report(&controller, outcome)?;
        }
        Command::Event { process_id } => {
            let outcome = controller.create_event(ProcessId(process_id)).await;
            report(&controller, outcome)?;
        }
        Command::Send {
            source,
            destination,
            message,
        } => {
            let outcome = controller
                .send_message_between(
                    Some(ProcessId(source)),
                    Some(ProcessId(destination)),
                    &message,
                )
                .await;
            report(&controller, outcome)?;
        }
        Command::Timeline => {
            let outcome = controller.refresh_events().await;
            report(&controller, outcome)?;
            let timeline = controller.timeline().await;
            print!("{}", clock_diagram(&timeline, None));
        }
        Command::Describe { x, y } => {
            let outcome = controller.refresh_events().await;
            report(&controller, outcome)?;
            let timeline = controller.timeline().await;
            println!("{}", timeline.describe(Coordinate::new(x, ProcessId(y))));
        }
    }

    Ok(())
}

/// Prints the alert the operation left behind and turns its failure into the
/// process exit status.
fn report<T>(controller: &InteractionController, outcome: Result<T, OperationError>) -> Result<()> {
    if let Some(alert) = controller.notifications().current() {
        println!("{}", alert_line(&alert));
    }
    outcome.map(|_| ()).map_err(anyhow::Error::from)
}
