use anyhow::{Context, Result};
use clap::Args;
use rental_pricing_core_rs::pricing::quote_product;
use rental_pricing_core_rs::{DurationMinutes, DurationUnits, PricingUnit};

use super::{CatalogArgs, OutputFormat};
use crate::catalog;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
    /// Product id
    #[arg(short, long)]
    pub product: String,
    /// Rental length in minutes (fractions round up)
    #[arg(short, long, conflicts_with = "units", required_unless_present = "units")]
    pub minutes: Option<f64>,
    /// Rental length in the product's pricing unit
    #[arg(short, long)]
    pub units: Option<u32>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Minutes to quote, from either `--minutes` or `--units`
fn requested_duration(
    minutes: Option<f64>,
    units: Option<u32>,
    unit: PricingUnit,
) -> Result<DurationMinutes> {
    match (minutes, units) {
        (Some(minutes), _) => DurationMinutes::from_fractional(minutes)
            .with_context(|| format!("invalid --minutes {}", minutes)),
        (None, Some(units)) => Ok(DurationUnits::new(units).to_minutes(unit)),
        (None, None) => anyhow::bail!("either --minutes or --units is required"),
    }
}

pub fn quote(args: QuoteArgs) -> Result<()> {
    let products = catalog::load(&args.catalog.catalog)?;
    let product = catalog::find(&products, &args.product)?;

    let duration = requested_duration(args.minutes, args.units, product.pricing_unit)?;

    let q = quote_product(product, duration)
        .with_context(|| format!("failed to quote '{}'", product.product_id))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&q)?),
        OutputFormat::Text | OutputFormat::Csv => {
            println!(
                "{}: {} for {} minutes (covers {})",
                product.product_id, q.cost, q.requested_minutes, q.covered_minutes
            );
            for package in &q.packages {
                println!(
                    "  {} x {} min @ {} = {}",
                    package.count,
                    package.period_minutes,
                    package.unit_price,
                    package.subtotal()
                );
            }
        }
    }
    Ok(())
}
