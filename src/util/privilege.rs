//! Effective user checks.

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Effective uid, for diagnostics.
pub fn effective_uid() -> u32 {
    nix::unistd::geteuid().as_raw()
}
