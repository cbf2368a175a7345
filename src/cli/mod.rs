//! CLI adapter for chunkwise
//!
//! Provides the command-line interface over the core pipeline. This
//! module depends on `core/`; nothing in `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chunkwise - chunk normalization for parsed documents
///
/// Turns parser output (PDF or HTML text blocks) into clean, typed,
/// serialized chunks ready for embedding.
#[derive(Parser, Debug)]
#[command(name = "chunkwise")]
#[command(version)]
#[command(about = "Chunk normalization pipeline for parsed documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides CHUNKWISE_CONFIG and the XDG config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline over parser output and write processed documents
    Process(commands::ProcessArgs),

    /// Run the pipeline on one document and print its chunks
    Inspect(commands::InspectArgs),

    /// Show the effective configuration and pipeline components
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    let xdg = XdgDirs::new();
    xdg.log_paths();

    let config = Config::load_with_xdg(cli.config.as_deref(), &xdg)?;

    let services = Arc::new(Services::new(config));

    match cli.command {
        Commands::Process(args) => commands::process::execute(args, &services, cli.format),
        Commands::Inspect(args) => commands::inspect::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, &xdg, cli.format)
        }
    }
}
