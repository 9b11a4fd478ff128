//! Command-line surface: subcommand implementations and console output.

pub mod commands;
pub mod output;
