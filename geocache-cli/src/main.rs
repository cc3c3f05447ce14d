//! geocache CLI - Diagnostics for the viewport cache
//!
//! Inspect key quantization, view the effective configuration, and replay
//! request traces to see how much traffic the cache would absorb.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "geocache")]
#[command(about = "Viewport-aware cache diagnostics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a viewport is quantized for cache keys
    Quantize {
        /// Northern latitude edge
        #[arg(long, allow_hyphen_values = true)]
        north: f64,

        /// Southern latitude edge
        #[arg(long, allow_hyphen_values = true)]
        south: f64,

        /// Eastern longitude edge
        #[arg(long, allow_hyphen_values = true)]
        east: f64,

        /// Western longitude edge
        #[arg(long, allow_hyphen_values = true)]
        west: f64,

        /// Map zoom level
        #[arg(short, long)]
        zoom: Option<u8>,
    },

    /// Show the effective cache configuration
    Config {
        /// Config file (defaults to ~/.geocache/config.ini)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replay a JSON-lines request trace against the caches
    Replay {
        /// Trace file, one request per line
        trace: PathBuf,

        /// Override the data cache capacity
        #[arg(short, long)]
        capacity: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Quantize {
            north,
            south,
            east,
            west,
            zoom,
        } => commands::quantize::run(north, south, east, west, zoom),
        Commands::Config { file } => commands::config::run(file),
        Commands::Replay { trace, capacity } => commands::replay::run(&trace, capacity).await,
    }
}
