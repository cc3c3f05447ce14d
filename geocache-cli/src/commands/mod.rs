//! CLI subcommand implementations.

pub mod config;
pub mod quantize;
pub mod replay;
