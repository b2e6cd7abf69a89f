pub mod backfill;
pub mod legacy;
pub mod parity;
pub mod quote;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rental-pricing")]
#[command(about = "Price rentals and check legacy tier parity against package rates.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cheapest package coverage for one product and duration
    #[command(alias = "q")]
    Quote(quote::QuoteArgs),
    /// Legacy threshold-discount cost for one product
    #[command(alias = "l")]
    Legacy(legacy::LegacyArgs),
    /// Emit translated tier packages for every product
    #[command(alias = "b")]
    Backfill(backfill::BackfillArgs),
    /// Sweep every product comparing legacy and package pricing
    #[command(alias = "p")]
    Parity(parity::ParityArgs),
}

/// Catalog file shared by every subcommand
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// JSON array of products
    #[arg(short, long, env = "PRICING_CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
