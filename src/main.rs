use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = storage_lock::cli::Cli::parse();
    cli.run()
}
