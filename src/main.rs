/// Synthetic order feed generator
///
/// Writes a CSV of simulated limit orders, skipping generation when the output
/// file is already present.
///
/// Usage:
///   datafeed --output test.csv --seed 42 --symbols ABC,DEF:2

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use datafeed::config::{default_market_open, DEFAULT_HORIZON_DAYS, DEFAULT_OVERLAP};
use datafeed::sink::DEFAULT_PREVIEW_ROWS;
use datafeed::{generate_csv, GeneratorConfig, SinkOptions, SinkOutcome, Universe};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic limit order feed as CSV")]
struct Args {
    /// Destination CSV file
    #[arg(long, short, default_value = "test.csv")]
    output: PathBuf,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated horizon in days
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon_days: i64,

    /// Market open, e.g. 2024-01-02T00:30:00 (default: today 00:30)
    #[arg(long)]
    market_open: Option<NaiveDateTime>,

    /// Spread divisor for limit price dispersion
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    overlap: f64,

    /// Instruments as SYMBOL[:WEIGHT], comma separated
    #[arg(long, value_delimiter = ',', default_value = "ABC,DEF")]
    symbols: Vec<String>,

    /// Regenerate even if the output exists
    #[arg(long)]
    force: bool,

    /// Leading rows echoed to the log
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview: usize,
}

fn parse_symbol(spec: &str) -> Result<(String, f64)> {
    match spec.split_once(':') {
        Some((symbol, weight)) => {
            let weight: f64 = weight
                .parse()
                .with_context(|| format!("invalid weight for {}", symbol))?;
            Ok((symbol.to_string(), weight))
        }
        None => Ok((spec.to_string(), 1.0)),
    }
}

fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let entries = args
        .symbols
        .iter()
        .map(|s| parse_symbol(s.trim()))
        .collect::<Result<Vec<_>>>()?;

    Ok(GeneratorConfig {
        horizon: Duration::try_days(args.horizon_days).context("horizon out of range")?,
        market_open: args.market_open.unwrap_or_else(default_market_open),
        overlap: args.overlap,
        universe: Universe::new(entries)?,
        seed: args.seed,
        ..GeneratorConfig::default()
    })
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let options = SinkOptions {
        force: args.force,
        preview_rows: args.preview,
    };

    let outcome = generate_csv(&args.output, &config, options)
        .with_context(|| format!("failed to generate {}", args.output.display()))?;

    match outcome {
        SinkOutcome::Skipped => info!("nothing to do"),
        SinkOutcome::Written { rows } => info!(rows, "done"),
    }

    Ok(())
}
