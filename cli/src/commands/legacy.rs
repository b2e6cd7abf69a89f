use anyhow::Result;
use clap::Args;
use rental_pricing_core_rs::pricing::{applicable_tier, legacy_cost};
use rental_pricing_core_rs::DurationUnits;
use serde_json::json;

use super::{CatalogArgs, OutputFormat};
use crate::catalog;

#[derive(Args, Debug)]
pub struct LegacyArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
    /// Product id
    #[arg(short, long)]
    pub product: String,
    /// Rental length in the product's pricing unit
    #[arg(short, long)]
    pub units: u32,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn legacy(args: LegacyArgs) -> Result<()> {
    let products = catalog::load(&args.catalog.catalog)?;
    let product = catalog::find(&products, &args.product)?;
    let units = DurationUnits::new(args.units);

    let cost = legacy_cost(product.base_price, &product.tiers, units);
    let tier = applicable_tier(&product.tiers, units);

    match args.format {
        OutputFormat::Json => {
            let out = json!({
                "product_id": product.product_id,
                "duration_units": units,
                "discount_percent": tier.map_or(0.0, |t| t.discount_percent()),
                "cost": cost,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text | OutputFormat::Csv => match tier {
            Some(t) => println!(
                "{}: {} for {} {}s ({}% off from {} units)",
                product.product_id,
                cost,
                units,
                product.pricing_unit,
                t.discount_percent(),
                t.min_duration_units()
            ),
            None => println!(
                "{}: {} for {} {}s (no discount)",
                product.product_id, cost, units, product.pricing_unit
            ),
        },
    }
    Ok(())
}
