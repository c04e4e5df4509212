//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cufirst - preview event cards and check site settings
#[derive(Debug, Parser)]
#[command(name = "cufirst")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CUFIRST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the date label of every event in a JSON events file
    Events {
        /// Events file (a JSON array), or `-` for stdin
        file: PathBuf,

        /// Print the rendered card markup instead of labels
        #[arg(long)]
        html: bool,
    },

    /// Format a single date string as the site would
    Label {
        /// Date text, e.g. "2025-07-04 to 2025-07-06"
        text: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
