//! Core modules.

pub mod config;
pub mod lock;
pub mod paths;
