//! Config file model (`storage-lock.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Storage root; relative paths are resolved under the system temp dir.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Sub-directory of the root, one per application instance group.
    #[serde(default)]
    pub application: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// tracing filter directive, e.g. `info` or `storage_lock=debug`.
    #[serde(default)]
    pub level: Option<String>,
}
