//! OpenShift AI Lightspeed operator CLI
//!
//! Inspects `OpenShiftAILightspeed` resources and the operator's resolved
//! configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lightspeed_operator_core::cli::{handle_defaults, handle_status, init_logging};
use lightspeed_operator_core::config::{ConfigLoader, OperatorDefaults};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lightspeed-operator-core")]
#[command(about = "Inspect OpenShift AI Lightspeed resources", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Write logs to a temporary file instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved configuration
    Defaults,
    /// Show the conditions of an OpenShiftAILightspeed resource
    Status {
        /// Resource name
        name: String,
        /// Namespace (defaults to the configured or kubeconfig namespace)
        #[arg(long, short = 'n')]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = init_logging(args.debug, args.log_file)? {
        eprintln!("Logging to {}", path.display());
    }

    let defaults = OperatorDefaults::from_env();
    let config = ConfigLoader::load(args.config.as_deref(), defaults)
        .context("Failed to load configuration")?;

    match args.command {
        Command::Defaults => handle_defaults(&config),
        Command::Status { name, namespace } => handle_status(&config, &name, namespace).await,
    }
}
