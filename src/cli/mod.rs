//! CLI routing and command dispatch.

use crate::constants;
use crate::core::config;
use crate::core::paths::StoragePaths;
use crate::util::logging;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod check;
pub mod doctor;
pub mod hold;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: StoragePaths,
}

#[derive(Parser, Debug)]
#[command(
    name = "storage-lock",
    version,
    about = "Detect two instances writing into the same storage directory"
)]
pub struct Cli {
    /// Storage root directory (relative paths are resolved under the temp dir)
    #[arg(long, global = true, value_name = "PATH", env = constants::ROOT_ENV)]
    pub root: Option<PathBuf>,

    /// Application name; its storage directory is <root>/<app>
    #[arg(long, global = true, value_name = "NAME", env = constants::APP_ENV)]
    pub app: Option<String>,

    /// Config file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = constants::CONFIG_ENV,
        default_value = constants::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let file = config::load(&self.config)?;
        logging::init(self.verbose, file.logging.level.as_deref());

        let application = self.app.or(file.storage.application);
        let paths = StoragePaths::resolve(self.root, file.storage.root, application.as_deref())?;
        tracing::debug!(%paths, config = %self.config.display(), "resolved storage directory");

        let ctx = CliContext { paths };

        match self.command {
            Commands::Check(args) => check::run(&ctx, args),
            Commands::Hold(args) => hold::run(&ctx, args),
            Commands::Doctor(args) => doctor::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Try the lock once, report whether the directory is free, then release
    Check(check::CheckArgs),
    /// Acquire the lock and hold it until stdin closes or the timeout elapses
    Hold(hold::HoldArgs),
    /// Diagnose the storage directory (read-only)
    Doctor(doctor::DoctorArgs),
}
