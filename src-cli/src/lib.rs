//! Lookout command-line shell
//!
//! Thin shell that parses arguments, wires the configured collaborators
//! together and dispatches to the command handlers. Reconnaissance logic
//! lives in the `crates/` directory.

pub mod cli;
pub mod commands;
pub mod state;

use anyhow::Context;
use clap::Parser;
use cli::{CaseCommand, Cli, Command};
use lookout_core::AppConfig;
use state::AppState;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "debug,lookout=trace"
    } else {
        "info,lookout=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Parse the command line and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting Lookout v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
    if let Some(file) = cli.platforms {
        config.scanning.platforms_file = Some(file);
    }
    if let Some(dir) = cli.cases_dir {
        config.cases.cases_dir = Some(dir);
    }
    config.validate().context("invalid configuration")?;

    let state = AppState::new(config)?;

    match cli.command {
        Command::Scan(args) => {
            let json = args.json;
            let outcome = commands::scan::run_scan(&state, args.into()).await?;
            commands::scan::print_outcome(&outcome, json)?;
        }
        Command::Case { command } => match command {
            CaseCommand::Create { name, analyst } => {
                let metadata = commands::case::create(&state, &name, &analyst)?;
                println!("{}", metadata.case_id);
            }
            CaseCommand::Status { case_id } => {
                let status = commands::case::status(&state, &case_id)?;
                println!("{}", serde_json::to_string(&status)?);
            }
            CaseCommand::Note { case_id, text } => {
                commands::case::note(&state, &case_id, &text)?;
                println!("Notes saved");
            }
        },
        Command::Platforms => {
            commands::platforms::print_platforms(&state);
        }
    }

    Ok(())
}
