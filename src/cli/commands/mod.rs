//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod fetch;
mod legend;
mod render;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "quakemap")]
#[command(about = "Map of recent earthquakes and tectonic plate boundaries")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Fetch both feeds once and write a self-contained HTML map
    Render {
        /// Output file (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the earthquake feed and print the encoded markers
    Fetch {
        /// Limit number of markers printed (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Print the depth legend
    Legend,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let (settings, _config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Render { output } => render::cmd_render(&settings, output).await,
        Commands::Fetch { limit } => fetch::cmd_fetch(&settings, limit).await,
        Commands::Legend => legend::cmd_legend(),
    }
}
