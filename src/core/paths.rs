//! Storage directory resolution.

use crate::constants;
use crate::util::path;
use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub root: PathBuf,
    pub storage_dir: PathBuf,
    pub lock_file: PathBuf,
}

impl StoragePaths {
    /// Resolve the storage root from CLI/env, then config, then the temp dir default.
    pub fn resolve(
        root_arg: Option<PathBuf>,
        config_root: Option<PathBuf>,
        application: Option<&str>,
    ) -> Result<Self> {
        let root = root_arg
            .or(config_root)
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_ROOT_DIR_NAME));
        Self::from_root(root, application)
    }

    /// Build paths under `root`. Relative roots live under the system temp dir.
    pub fn from_root(root: PathBuf, application: Option<&str>) -> Result<Self> {
        let root = if root.is_absolute() {
            path::normalize(&root)
        } else {
            path::normalize(&env::temp_dir().join(root))
        };
        let storage_dir = match application {
            Some(app) => {
                if !path::is_plain_name(app) {
                    bail!("invalid application name '{}'", app);
                }
                root.join(app)
            }
            None => root.clone(),
        };
        let lock_file = storage_dir.join(constants::LOCK_FILE_NAME);
        Ok(Self {
            root,
            storage_dir,
            lock_file,
        })
    }
}

impl std::fmt::Display for StoragePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage@{}", self.storage_dir.display())
    }
}
