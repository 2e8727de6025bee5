//! Prospecto CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a starter prospecto.toml
//! - `serve`    — Start the HTTP gateway server
//! - `chat`     — Drive the conversation from the terminal
//! - `catalog`  — Inspect the program catalog
//! - `doctor`   — Diagnose configuration and data files

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "prospecto",
    about = "Prospecto — WhatsApp admissions assistant for the UNAC graduate school",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to prospecto.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter prospecto.toml
    Init,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the assistant from the terminal
    Chat,

    /// List faculties and programs from the catalog
    Catalog {
        /// Show a single faculty by id
        #[arg(short, long)]
        faculty: Option<String>,
    },

    /// Diagnose configuration and data files
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Chat => commands::chat::run(config_path).await?,
        Commands::Catalog { faculty } => commands::catalog::run(config_path, faculty).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
