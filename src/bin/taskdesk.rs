//! Operational entry point for taskdesk.
//!
//! Settings are read from `TASKDESK_*` environment variables; the command
//! line only selects the action. Failures are returned from `main`, so they
//! reach stderr even when no subscriber could be installed.

use std::ffi::OsString;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use taskdesk::config::TaskdeskSettings;
use taskdesk::persistence::{PersistenceSetupError, apply_schema, build_pool};
use taskdesk::telemetry::{TelemetryError, init_tracing};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about = "Task assignment backend tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the users and tasks tables if they do not exist.
    Migrate,
    /// Check that the database is reachable.
    Ping,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Persistence(#[from] PersistenceSetupError),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    run(&cli).inspect_err(|err| error!(error = %err, "taskdesk command failed"))
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = TaskdeskSettings::load_from_iter([OsString::from("taskdesk")])
        .map_err(|err| CliError::Config(err.to_string()))?;
    init_tracing(&settings)?;

    let pool = build_pool(&settings)?;
    let mut connection = pool.get().map_err(PersistenceSetupError::from)?;
    match cli.command {
        Command::Migrate => apply_schema(&mut connection)?,
        Command::Ping => info!("database reachable"),
    }
    Ok(())
}
