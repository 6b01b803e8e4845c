//! Diagnostics for the storage directory.

use crate::cli::CliContext;
use crate::core::lock::StorageLock;
use crate::util::{fs as storage_fs, privilege};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Skip the lock probe
    #[arg(long)]
    pub no_probe: bool,
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let paths = &ctx.paths;
    let mut ok = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;

    println!("Doctor: {}", paths);
    println!("  [INFO] effective uid: {}", privilege::effective_uid());

    if paths.storage_dir.is_dir() {
        println!("  [PASS] storage directory exists: {}", paths.storage_dir.display());
        ok += 1;
    } else if paths.storage_dir.exists() {
        println!("  [FAIL] storage path is not a directory: {}", paths.storage_dir.display());
        fail += 1;
    } else {
        println!(
            "  [WARN] storage directory missing (created on first run): {}",
            paths.storage_dir.display()
        );
        warn += 1;
    }

    if paths.storage_dir.is_dir() {
        if storage_fs::is_writable_dir(&paths.storage_dir) {
            println!("  [PASS] storage directory writable");
            ok += 1;
        } else {
            println!("  [FAIL] storage directory not writable");
            fail += 1;
        }
    }

    if paths.lock_file.is_file() {
        println!("  [PASS] lock file present: {}", paths.lock_file.display());
        ok += 1;

        // Only probe an existing sentinel so doctor creates nothing.
        if !args.no_probe {
            match StorageLock::open(&paths.storage_dir) {
                Ok(lock) => {
                    if lock.state().is_acquired() {
                        println!("  [PASS] lock is free");
                        ok += 1;
                    } else {
                        println!("  [WARN] lock is held by another instance");
                        warn += 1;
                    }
                    if let Err(e) = lock.release() {
                        println!("  [FAIL] probe release failed: {:#}", anyhow::Error::from(e));
                        fail += 1;
                    }
                }
                Err(e) => {
                    println!("  [FAIL] {:#}", anyhow::Error::from(e));
                    fail += 1;
                }
            }
        }
    } else {
        println!("  [INFO] lock file not created yet: {}", paths.lock_file.display());
    }

    println!();
    println!("Doctor summary: {} pass, {} warn, {} fail", ok, warn, fail);
    if fail > 0 {
        std::process::exit(1);
    }
    Ok(())
}
