//! Utility modules for filesystem, paths, privileges and logging.

pub mod fs;
pub mod logging;
pub mod path;
pub mod privilege;
