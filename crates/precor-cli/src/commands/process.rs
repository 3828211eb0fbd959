//! Process command - extract and correct a single requisition PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use precor_core::correction::WITHHOLDING_RATE;
use precor_core::requisition::rules::{format_brl_currency, format_cpf};
use precor_core::{
    AsOfMonth, CorrectionResult, IndexationCalculator, PdfExtractor, PrecorConfig,
    RequisitionExtractor, RequisitionFields, RequisitionParser,
};

use super::config::load_config;
use super::index::load_calculator;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Read the index series from this file instead of fetching it
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Show extraction warnings and confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Serialized result of a processed requisition.
#[derive(Debug, Serialize)]
pub struct CorrectionReport<'a> {
    pub status: &'static str,
    pub input_data: &'a RequisitionFields,
    pub result: ReportValues,
}

#[derive(Debug, Serialize)]
pub struct ReportValues {
    pub corrected_gross_value: Decimal,
    pub final_net_value: Decimal,
    /// As-of month, MM/YYYY.
    pub last_corrected_month: String,
    pub index_applied: bool,
}

impl<'a> CorrectionReport<'a> {
    pub fn new(fields: &'a RequisitionFields, result: &CorrectionResult) -> Self {
        Self {
            status: "success",
            input_data: fields,
            result: ReportValues {
                corrected_gross_value: result.corrected_gross_value,
                final_net_value: result.final_net_value,
                last_corrected_month: result.as_of_month().month().to_string(),
                index_applied: result.is_corrected(),
            },
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Extracting requisition data...");
    pb.set_position(10);

    let parser = RequisitionParser::new().with_cpf_validation(config.extraction.validate_cpf);
    let (fields, warnings, confidence) = extract_fields(&args.input, &parser, &config)?;

    pb.set_message("Loading index series...");
    pb.set_position(50);

    let calculator = load_calculator(&config, args.index_file.as_deref()).await?;

    pb.set_message("Calculating...");
    pb.set_position(90);

    let result = calculator.calculate_fields(&fields)?;

    pb.finish_and_clear();

    if let AsOfMonth::NoIndexAvailable(month) = result.as_of_month() {
        warn!("No index data from {} onwards, value was not corrected", month);
    }

    let output = format_report(&fields, &result, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            confidence * 100.0
        );
        for warning in &warnings {
            eprintln!("  - {}", style(warning).yellow());
        }
        if calculator.is_degraded() {
            eprintln!("{} Ran without index data", style("⚠").yellow());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a PDF and parse its requisition fields.
pub fn extract_fields(
    path: &Path,
    parser: &RequisitionParser,
    config: &PrecorConfig,
) -> anyhow::Result<(RequisitionFields, Vec<String>, f32)> {
    let data = fs::read(path)?;
    let content = PdfExtractor::from_bytes(&data)?;

    debug!("PDF has {} pages", content.page_count);

    if content.text.trim().len() < config.extraction.min_text_length {
        anyhow::bail!(
            "PDF has too little text ({} chars); scanned documents are not supported",
            content.text.trim().len()
        );
    }

    let parsed = parser.parse(&content.text)?;
    for warning in &parsed.warnings {
        debug!("{}: {}", path.display(), warning);
    }

    parsed.fields.require_correction_input().map_err(|e| {
        anyhow::anyhow!("Could not extract gross value or base date from the PDF ({})", e)
    })?;

    Ok((parsed.fields, parsed.warnings, parsed.confidence))
}

/// Correct the extracted fields, reporting the outcome.
pub fn correct(calculator: &IndexationCalculator, fields: &RequisitionFields) -> anyhow::Result<CorrectionResult> {
    Ok(calculator.calculate_fields(fields)?)
}

pub fn format_report(
    fields: &RequisitionFields,
    result: &CorrectionResult,
    format: OutputFormat,
    config: &PrecorConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&CorrectionReport::new(fields, result))?),
        OutputFormat::Csv => format_csv(fields, result),
        OutputFormat::Text => Ok(format_text(fields, result, &config.output.currency_symbol)),
    }
}

fn format_csv(fields: &RequisitionFields, result: &CorrectionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "letter_number",
        "beneficiary_name",
        "beneficiary_cpf",
        "gross_value",
        "base_date",
        "corrected_gross_value",
        "final_net_value",
        "last_corrected_month",
    ])?;

    wtr.write_record([
        fields.letter_number.clone().unwrap_or_default(),
        fields.beneficiary_name.clone().unwrap_or_default(),
        fields.beneficiary_cpf.clone().unwrap_or_default(),
        fields.gross_value.map(|v| v.to_string()).unwrap_or_default(),
        fields.base_date.clone().unwrap_or_default(),
        result.corrected_gross_value.to_string(),
        result.final_net_value.to_string(),
        result.as_of_month().month().to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(fields: &RequisitionFields, result: &CorrectionResult, symbol: &str) -> String {
    let mut output = String::new();

    if let Some(number) = &fields.letter_number {
        output.push_str(&format!("Requisition: {}\n", number));
    }
    if let Some(name) = &fields.beneficiary_name {
        output.push_str(&format!("Beneficiary: {}\n", name));
    }
    if let Some(cpf) = &fields.beneficiary_cpf {
        output.push_str(&format!("CPF:         {}\n", format_cpf(cpf)));
    }
    if let Some(date) = &fields.base_date {
        output.push_str(&format!("Base date:   {}\n", date));
    }
    output.push('\n');

    output.push_str(&format_values(fields.gross_value, result, symbol));
    output
}

/// Value lines shared by `process` and `calculate`.
pub fn format_values(gross_value: Option<Decimal>, result: &CorrectionResult, symbol: &str) -> String {
    let mut output = String::new();

    if let Some(gross) = gross_value {
        output.push_str(&format!("Gross value:           {}\n", format_brl_currency(gross, symbol)));
    }
    output.push_str(&format!(
        "Corrected gross value: {}\n",
        format_brl_currency(result.corrected_gross_value, symbol)
    ));
    output.push_str(&format!(
        "Net value ({}% w/h):    {}\n",
        (WITHHOLDING_RATE * Decimal::ONE_HUNDRED).normalize(),
        format_brl_currency(result.final_net_value, symbol)
    ));

    match result.as_of_month() {
        AsOfMonth::Indexed(month) => {
            output.push_str(&format!("Corrected through:     {}\n", month));
        }
        AsOfMonth::NoIndexAvailable(month) => {
            output.push_str(&format!(
                "Corrected through:     {} (no index available, value not corrected)\n",
                month
            ));
        }
    }

    output
}
