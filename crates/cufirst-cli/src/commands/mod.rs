//! Command implementations.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

pub mod config;
pub mod events;
pub mod label;
