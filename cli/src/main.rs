//! # toolsmith CLI
//!
//! Command-line interface for toolsmith - an agent runtime that grows its
//! own toolbox.
//!
//! ## Usage
//!
//! - `toolsmith` - Start the meta-tooling loop (default)
//! - `toolsmith assist` - Routed question-answering loop
//! - `toolsmith serve` - Run the calculator tool server
//! - `toolsmith proof` - Scripted in-process client/server session
//! - `toolsmith tools` - Show tool manifests and built-in handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{assist_command, meta_command, proof_command, serve_command, tools_command};
use config::CliConfigLoader;

/// Default manifest directory relative to the working directory
const DEFAULT_TOOLS_DIR: &str = "generated_tools";

/// toolsmith - an agent runtime that grows its own toolbox
#[derive(Parser)]
#[command(name = "toolsmith")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An agent runtime that mints, stores, and routes its own tools")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Protocol to use (ollama, openai_compat)
    #[arg(long)]
    protocol: Option<String>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Directory holding generated tool manifests
    #[arg(long, default_value = DEFAULT_TOOLS_DIR)]
    tools_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the meta-tooling loop (the default when no subcommand is given)
    Meta,

    /// Routed question-answering loop with specialist assistants
    Assist,

    /// Run the calculator tool server until interrupted
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Spawn the server in-process and run a scripted client session
    Proof {
        /// Port to bind
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Show tool manifests and built-in handlers
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(protocol) = &cli.protocol {
        loader = loader.with_protocol_override(protocol.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config_loader = build_config_loader(&cli);

    match cli.command {
        None | Some(Commands::Meta) => meta_command(config_loader, cli.tools_dir).await,
        Some(Commands::Assist) => assist_command(config_loader).await,
        Some(Commands::Serve { host, port }) => serve_command(host, port).await,
        Some(Commands::Proof { port }) => proof_command(port).await,
        Some(Commands::Tools) => tools_command(cli.tools_dir).await,
    }
}
