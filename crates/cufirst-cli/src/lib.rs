//! Preview tool for event data and site configuration
//!
//! This crate provides the `cufirst` command-line interface. It renders the
//! same labels and card markup the site shows, from a local events file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};
