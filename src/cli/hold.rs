//! Hold the lock in the foreground, e.g. to reproduce a double-instance setup.

use crate::cli::CliContext;
use crate::constants;
use crate::core::lock::StorageLock;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct HoldArgs {
    /// Release after this many seconds instead of waiting for stdin to close
    #[arg(long, value_name = "N")]
    pub seconds: Option<u64>,
}

pub fn run(ctx: &CliContext, args: HoldArgs) -> Result<()> {
    let mut lock = StorageLock::open(&ctx.paths.storage_dir)?;
    if !lock.is_acquired() {
        lock.release()?;
        eprintln!(
            "error: {} is in use by another instance",
            ctx.paths.storage_dir.display()
        );
        std::process::exit(constants::EXIT_IN_USE);
    }

    println!("holding {}", lock.lock_path().display());
    io::stdout().flush().context("flush stdout")?;

    match args.seconds {
        Some(secs) => thread::sleep(Duration::from_secs(secs)),
        None => {
            io::copy(&mut io::stdin().lock(), &mut io::sink()).context("wait for stdin")?;
        }
    }

    lock.release()?;
    println!("released {}", ctx.paths.storage_dir.display());
    Ok(())
}
