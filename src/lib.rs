//! Storage directory lock.
//!
//! Guards a storage directory against a second, independent process writing
//! into it. [`core::lock::StorageLock`] takes a non-blocking exclusive advisory
//! lock on a sentinel file inside the directory and reports whether it got it.
//!
//! ## Modules
//! - `cli` — Command-line handlers (`check`, `hold`, `doctor`)
//! - `core` — The lock, storage path resolution, config loading
//! - `models` — Config file structures
//! - `util` — fs, path, privilege and logging helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;

pub use crate::core::lock::{Acquisition, LockError, StorageLock};
