//! Index command - fetch and inspect the IPCA series.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use precor_core::error::IndexError;
use precor_core::index::{parse_sgs_series, sgs::IPCA_SERIES_CODE, JsonFileIndexProvider};
use precor_core::models::config::IndexConfig;
use precor_core::requisition::rules::format_brl_amount;
use precor_core::{FetchFailurePolicy, IndexSeries, IndexSeriesProvider, IndexationCalculator, PrecorConfig, YearMonth};

use super::config::load_config;

/// Arguments for the index command.
#[derive(Args)]
pub struct IndexArgs {
    #[command(subcommand)]
    command: IndexCommand,
}

#[derive(Subcommand)]
enum IndexCommand {
    /// Download the series and save it as JSON
    Fetch(FetchArgs),

    /// Print the series
    Show(ShowArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ShowArgs {
    /// Read the series from this file instead of fetching it
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Only show months from MM/YYYY onwards
    #[arg(long)]
    since: Option<String>,
}

pub async fn run(args: IndexArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        IndexCommand::Fetch(fetch_args) => fetch(fetch_args, &config).await,
        IndexCommand::Show(show_args) => show(show_args, &config).await,
    }
}

async fn fetch(args: FetchArgs, config: &PrecorConfig) -> anyhow::Result<()> {
    let series = fetch_sgs_series(&config.index).await?;

    match &args.output {
        Some(path) => {
            JsonFileIndexProvider::new(path).save(&series)?;
            println!(
                "{} Saved {} months to {}",
                style("✓").green(),
                series.len(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&series)?),
    }

    Ok(())
}

async fn show(args: ShowArgs, config: &PrecorConfig) -> anyhow::Result<()> {
    let series = load_series(config, args.index_file.as_deref()).await?;

    let since = match &args.since {
        Some(s) => s.parse::<YearMonth>()?,
        None => series
            .first_month()
            .ok_or_else(|| anyhow::anyhow!("Index series is empty"))?,
    };

    println!(
        "{} IPCA (SGS {}), {} months",
        style("ℹ").blue(),
        IPCA_SERIES_CODE,
        series.len()
    );

    for entry in series.since(since) {
        println!("  {}  {:>7}%", entry.month, format_brl_amount(entry.percent));
    }

    Ok(())
}

/// Download the SGS series once.
pub async fn fetch_sgs_series(config: &IndexConfig) -> anyhow::Result<IndexSeries> {
    info!("Fetching index series from {}", config.source_url);

    let client = reqwest::Client::builder()
        .user_agent(concat!("precor-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let response = client.get(&config.source_url).send().await?.error_for_status()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Downloading IPCA series...");

    let mut stream = response.bytes_stream();
    let mut body = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        body.extend_from_slice(&chunk);
        pb.set_message(format!("Downloading IPCA series... {} bytes", body.len()));
    }

    pb.finish_and_clear();

    let series = parse_sgs_series(&body)?;
    debug!(
        "Fetched {} months ({:?} - {:?})",
        series.len(),
        series.first_month().map(|m| m.to_string()),
        series.last_month().map(|m| m.to_string())
    );

    Ok(series)
}

/// Read the series from a file if one is given or configured, otherwise fetch it.
pub async fn load_series(config: &PrecorConfig, index_file: Option<&Path>) -> anyhow::Result<IndexSeries> {
    match index_file.or(config.index.cache_file.as_deref()) {
        Some(path) => Ok(JsonFileIndexProvider::new(path).series()?),
        None => fetch_sgs_series(&config.index).await,
    }
}

/// Build the calculator for a run, applying the configured fetch-failure policy.
///
/// Only an unreachable source can degrade; a series that was read but is
/// malformed or empty always fails.
pub async fn load_calculator(
    config: &PrecorConfig,
    index_file: Option<&Path>,
) -> anyhow::Result<IndexationCalculator> {
    let series = match load_series(config, index_file).await {
        Ok(series) => series,
        Err(e) if is_unavailable(&e) && config.index.on_fetch_failure == FetchFailurePolicy::Degrade => {
            warn!("Index series unavailable ({:#}), values will not be corrected", e);
            return Ok(IndexationCalculator::uncorrected());
        }
        Err(e) => return Err(e.context("could not obtain index series")),
    };

    IndexationCalculator::new(series)
        .map_err(|e| anyhow::Error::new(e).context("could not obtain index series"))
}

fn is_unavailable(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<IndexError>(), Some(IndexError::Unavailable(_)))
        || err.downcast_ref::<reqwest::Error>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn degrade_config() -> PrecorConfig {
        let mut config = PrecorConfig::default();
        config.index.on_fetch_failure = FetchFailurePolicy::Degrade;
        config
    }

    #[tokio::test]
    async fn test_degrade_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let calculator = load_calculator(&degrade_config(), Some(&missing)).await.unwrap();
        assert!(calculator.is_degraded());

        assert!(load_calculator(&PrecorConfig::default(), Some(&missing)).await.is_err());
    }

    #[tokio::test]
    async fn test_degrade_does_not_hide_bad_series() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.json");
        let empty = dir.path().join("empty.json");
        fs::write(&corrupt, "not json").unwrap();
        fs::write(&empty, "[]").unwrap();

        let err = load_calculator(&degrade_config(), Some(&corrupt)).await.unwrap_err();
        assert!(err.to_string().contains("could not obtain index series"));
        assert!(load_calculator(&degrade_config(), Some(&empty)).await.is_err());
    }

    #[tokio::test]
    async fn test_loads_series_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipca.json");
        fs::write(&path, r#"[{"month": "01/2024", "percent": "0.42"}]"#).unwrap();

        let calculator = load_calculator(&PrecorConfig::default(), Some(&path)).await.unwrap();
        assert!(!calculator.is_degraded());
        assert_eq!(calculator.series().len(), 1);
    }
}
