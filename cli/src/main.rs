mod catalog;
mod commands;
mod logging;

use commands::{backfill, legacy, parity, quote, CommandLine, Commands};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    match commands.command {
        Commands::Quote(args) => quote::quote(args),
        Commands::Legacy(args) => legacy::legacy(args),
        Commands::Backfill(args) => backfill::backfill(args),
        Commands::Parity(args) => parity::parity(args),
    }
}
