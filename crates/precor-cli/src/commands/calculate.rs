//! Calculate command - correct a value without reading a PDF.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::json;

use precor_core::error::CorrectionError;
use precor_core::requisition::rules::parse_brl_amount;

use super::config::load_config;
use super::index::load_calculator;
use super::process::format_values;

/// Arguments for the calculate command.
#[derive(Args)]
pub struct CalculateArgs {
    /// Gross value, either 1234.56 or 1.234,56
    #[arg(long, allow_hyphen_values = true)]
    gross: String,

    /// Base date, DD/MM/YYYY
    #[arg(long)]
    base_date: String,

    /// Read the index series from this file instead of fetching it
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: CalculateFormat,

    /// Include every compounding step in the JSON output
    #[arg(long)]
    show_steps: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CalculateFormat {
    Json,
    Text,
}

pub async fn run(args: CalculateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let gross = parse_gross(&args.gross)?;

    let calculator = load_calculator(&config, args.index_file.as_deref()).await?;
    let result = calculator.calculate(gross, &args.base_date)?;

    match args.format {
        CalculateFormat::Json => {
            let mut output = json!({
                "corrected_gross_value": result.corrected_gross_value,
                "final_net_value": result.final_net_value,
                "last_corrected_month": result.as_of_month().month().to_string(),
                "index_applied": result.is_corrected(),
            });
            if args.show_steps {
                output["steps"] = serde_json::to_value(&result.steps)?;
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        CalculateFormat::Text => {
            print!(
                "{}",
                format_values(Some(gross), &result, &config.output.currency_symbol)
            );
        }
    }

    Ok(())
}

/// Accept `1234.56` or Brazilian `1.234,56`, with an optional leading minus.
fn parse_gross(s: &str) -> anyhow::Result<Decimal> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let plain = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
        && !digits.starts_with('.')
        && !digits.ends_with('.');

    let value = if plain {
        Decimal::from_str(digits).ok()
    } else {
        parse_brl_amount(digits)
    }
    .ok_or_else(|| CorrectionError::InvalidInput(format!("invalid gross value '{}'", s)))?;

    Ok(if negative { -value } else { value })
}
