//! CLI application for payment-requisition value correction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, calculate, config, index, process};

/// Requisition correction - extract a payment requisition and update its value by IPCA
#[derive(Parser)]
#[command(name = "precor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and correct a single requisition PDF
    Process(process::ProcessArgs),

    /// Extract and correct multiple requisition PDFs
    Batch(batch::BatchArgs),

    /// Correct a gross value without a PDF
    Calculate(calculate::CalculateArgs),

    /// Fetch or inspect the index series
    Index(index::IndexArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Calculate(args) => calculate::run(args, config_path).await,
        Commands::Index(args) => index::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
