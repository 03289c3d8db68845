use anyhow::Result;
use clap::{Parser, Subcommand};
use fxc::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Ui => fxc::AppCommand::Interactive,
            Commands::Currencies => fxc::AppCommand::Currencies,
            Commands::Convert { amount, from, to } => fxc::AppCommand::Convert { from, to, amount },
            Commands::History { from, to } => fxc::AppCommand::History { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Open the interactive converter (default)
    Ui,
    /// List supported currencies
    Currencies,
    /// Convert an amount and show the last 3 months of rates
    Convert {
        /// Amount to convert; a comma works as decimal separator
        amount: String,
        /// Source currency, by name or code
        #[arg(short, long)]
        from: String,
        /// Target currency, by name or code
        #[arg(short, long)]
        to: String,
    },
    /// Show the last 3 months of rates for a pair
    History {
        /// Base currency, by name or code
        #[arg(short, long)]
        from: String,
        /// Quote currency, by name or code
        #[arg(short, long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let result = match cli.command {
        Some(Commands::Setup) => fxc::cli::setup::setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => fxc::run_command(fxc::AppCommand::Interactive, cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
