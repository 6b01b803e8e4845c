use crate::cli::CliContext;
use crate::constants;
use crate::core::lock::{Acquisition, StorageLock};
use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    directory: String,
    lock_file: String,
    state: Acquisition,
}

pub fn run(ctx: &CliContext, args: CheckArgs) -> Result<()> {
    let lock = StorageLock::open(&ctx.paths.storage_dir)?;
    let report = CheckReport {
        directory: lock.directory().display().to_string(),
        lock_file: lock.lock_path().display().to_string(),
        state: lock.state(),
    };
    lock.release()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    if !report.state.is_acquired() {
        std::process::exit(constants::EXIT_IN_USE);
    }
    Ok(())
}

fn print_table(report: &CheckReport) {
    let state = if report.state.is_acquired() {
        Cell::new("free").fg(Color::Green)
    } else {
        Cell::new("in use by another instance").fg(Color::Red)
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Directory").add_attribute(Attribute::Bold),
        Cell::new("Lock file").add_attribute(Attribute::Bold),
        Cell::new("State").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(&report.directory),
        Cell::new(&report.lock_file),
        state,
    ]);
    println!("{}", table);
}
