//! Centralized constants for file names, environment variables, and exit codes.

/// Name of the sentinel file locked inside the storage directory.
pub const LOCK_FILE_NAME: &str = "storage.lock";

/// Directory created under the system temp dir when no root is configured.
pub const DEFAULT_ROOT_DIR_NAME: &str = "storage-lock";

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "storage-lock.toml";

/// Overrides the storage root.
pub const ROOT_ENV: &str = "STORAGE_LOCK_ROOT";

/// Overrides the application name (sub-directory of the root).
pub const APP_ENV: &str = "STORAGE_LOCK_APP";

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "STORAGE_LOCK_CONFIG";

/// Default log filter when neither `RUST_LOG` nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Process exit code when the directory is locked by another instance.
pub const EXIT_IN_USE: i32 = 2;
