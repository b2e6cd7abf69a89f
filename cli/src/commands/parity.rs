use anyhow::{Context, Result};
use clap::Args;
use rental_pricing_core_rs::parity::{check_catalog, to_csv, ParityConfig};
use rental_pricing_core_rs::Money;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use super::{CatalogArgs, OutputFormat};
use crate::catalog;

#[derive(Args, Debug)]
pub struct ParityArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
    /// JSON parity config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Report differences larger than this amount
    #[arg(long, env = "PARITY_THRESHOLD")]
    pub threshold: Option<f64>,
    /// Worker threads (defaults to one per CPU)
    #[arg(long, env = "PARITY_WORKERS")]
    pub workers: Option<usize>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Exit non-zero when any mismatch or failure is found
    #[arg(long)]
    pub fail_on_mismatch: bool,
}

fn load_config(args: &ParityArgs) -> Result<ParityConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read parity config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse parity config {}", path.display()))?
        }
        None => ParityConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.threshold = Money::from_decimal(threshold).context("invalid --threshold")?;
    }
    if args.workers.is_some() {
        config.workers = args.workers;
    }
    Ok(config)
}

pub fn parity(args: ParityArgs) -> Result<()> {
    let config = load_config(&args)?;
    let products = catalog::load(&args.catalog.catalog)?;
    let report = check_catalog(&products, &config)?;
    let summary = report.summary();

    for failure in &report.failures {
        warn!(product_id = %failure.product_id, error = %failure.error, "product skipped");
    }

    match args.format {
        OutputFormat::Csv => print!("{}", to_csv(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("run {} (catalog {})", report.run_id, report.catalog_fingerprint);
            for product in &report.products {
                match product.worst() {
                    Some(worst) => println!(
                        "  {}: {} of {} durations differ, total {}, worst {} at {} {}s",
                        product.product_id,
                        product.mismatch_count(),
                        product.durations_checked,
                        product.total_abs_diff,
                        worst.diff,
                        worst.duration_units,
                        product.pricing_unit
                    ),
                    None => println!(
                        "  {}: clean over {} durations",
                        product.product_id, product.durations_checked
                    ),
                }
            }
            for failure in &report.failures {
                println!("  {}: FAILED {}", failure.product_id, failure.error);
            }
            println!(
                "{} products checked, {} failed, {} mismatches over {} durations",
                summary.products_checked,
                summary.products_failed,
                summary.mismatch_count,
                summary.durations_checked
            );
        }
    }

    if args.fail_on_mismatch && (summary.mismatch_count > 0 || summary.products_failed > 0) {
        anyhow::bail!(
            "parity check found {} mismatches and {} failed products",
            summary.mismatch_count,
            summary.products_failed
        );
    }
    Ok(())
}
