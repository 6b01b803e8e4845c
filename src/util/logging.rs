//! tracing subscriber setup. Logs go to stderr; stdout is reserved for reports.

use crate::constants;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins, then `--verbose`, then the configured level.
pub fn init(verbose: bool, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, configured)));
    // A second init (tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directive(verbose: bool, configured: Option<&str>) -> &str {
    if verbose {
        "debug"
    } else {
        configured.unwrap_or(constants::DEFAULT_LOG_LEVEL)
    }
}
