//! cufirst CLI entry point.

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use cufirst_cli::cli::{Cli, Command, ConfigAction};
use cufirst_cli::commands;
use cufirst_cli::config;
use cufirst_cli::error::CliResult;
use cufirst_core::tracing::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::verbose()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {e}");
    }

    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<String> {
    let config = match cli.config {
        Some(ref path) => config::load_from(path)?,
        None => config::load()?,
    };

    match cli.command {
        Command::Events { file, html } => {
            let payload = commands::events::read_payload(&file)?;
            commands::events::render(&payload, html, &config, Local)
        }
        Command::Label { text } => {
            Ok(format!("{}\n", commands::label::label(&text, &config.events)))
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => Ok(commands::config::path()),
        },
    }
}
