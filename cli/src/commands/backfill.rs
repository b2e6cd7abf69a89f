use anyhow::Result;
use clap::Args;
use rental_pricing_core_rs::parity::backfill_to_csv;
use rental_pricing_core_rs::pricing::{backfill_rows, BackfillRow};
use tracing::info;

use super::{CatalogArgs, OutputFormat};
use crate::catalog;

#[derive(Args, Debug)]
pub struct BackfillArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,
}

pub fn backfill(args: BackfillArgs) -> Result<()> {
    let products = catalog::load(&args.catalog.catalog)?;
    let rows: Vec<BackfillRow> = products.iter().flat_map(backfill_rows).collect();
    info!(products = products.len(), rows = rows.len(), "backfill rows generated");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv | OutputFormat::Text => print!("{}", backfill_to_csv(&rows)),
    }
    Ok(())
}
