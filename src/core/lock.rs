//! Exclusive advisory lock on a storage directory.
//!
//! Detects a second process writing into the same directory. A fixed-name
//! sentinel file inside the directory is locked with a non-blocking flock(2)
//! (LockFileEx on Windows). The lock is advisory: only cooperating processes
//! observe it, and it never crosses hosts.

use crate::constants;
use fs2::FileExt;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal storage errors. Contention is never one of these, see [`Acquisition`].
#[derive(Debug, Error)]
pub enum LockError {
    #[error("storage directory can't be created: {}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lock file can't be opened: {}", path.display())]
    LockFileUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unlock {}", path.display())]
    Unlock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("close lock file {}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a lock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acquisition {
    Acquired,
    NotAcquired,
}

impl Acquisition {
    pub fn is_acquired(self) -> bool {
        matches!(self, Acquisition::Acquired)
    }
}

/// Lock handle for one storage directory.
///
/// Owns the open sentinel file and, once acquired, the flock bound to it.
/// [`StorageLock::release`] consumes the handle; dropping it without releasing
/// closes the file and lets the OS drop the lock.
#[derive(Debug)]
pub struct StorageLock {
    directory: PathBuf,
    lock_path: PathBuf,
    file: File,
    state: Acquisition,
}

impl StorageLock {
    /// Open the lock for `directory` and make one acquisition attempt.
    ///
    /// Creates the directory (mkdir -p) and the sentinel file when missing.
    /// Returns `Ok` even when another handle holds the lock; check
    /// [`StorageLock::is_acquired`].
    pub fn open(directory: &Path) -> Result<Self, LockError> {
        ensure_directory(directory)?;

        let lock_path = directory.join(constants::LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| LockError::LockFileUnavailable {
                path: lock_path.clone(),
                source,
            })?;

        let mut lock = Self {
            directory: directory.to_path_buf(),
            lock_path,
            file,
            state: Acquisition::NotAcquired,
        };
        lock.attempt();
        Ok(lock)
    }

    /// Whether the lock is held, retrying once if it is not.
    pub fn is_acquired(&mut self) -> bool {
        self.attempt().is_acquired()
    }

    /// Current state without a new attempt.
    pub fn state(&self) -> Acquisition {
        self.state
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Unlock (if held), then close the file.
    ///
    /// The close step runs even when unlocking fails. A close failure takes
    /// precedence over an unlock failure. The sentinel file is left on disk.
    pub fn release(self) -> Result<(), LockError> {
        let Self {
            lock_path,
            file,
            state,
            ..
        } = self;

        let unlocked = if state.is_acquired() {
            FileExt::unlock(&file)
        } else {
            Ok(())
        };
        let closed = close(file);

        tracing::debug!(lock = %lock_path.display(), ?state, "storage lock released");

        closed.map_err(|source| LockError::Close {
            path: lock_path.clone(),
            source,
        })?;
        unlocked.map_err(|source| LockError::Unlock {
            path: lock_path,
            source,
        })
    }

    /// Single non-blocking attempt. No-op once acquired.
    fn attempt(&mut self) -> Acquisition {
        if self.state.is_acquired() {
            return self.state;
        }
        match self.file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(lock = %self.lock_path.display(), "storage lock acquired");
                self.state = Acquisition::Acquired;
            }
            // Includes a second handle opened by this same process.
            Err(ref e) if is_contended(e) => {
                tracing::debug!(
                    lock = %self.lock_path.display(),
                    "storage directory in use by another handle"
                );
            }
            Err(e) => {
                tracing::warn!(
                    lock = %self.lock_path.display(),
                    error = %e,
                    "storage lock attempt failed"
                );
            }
        }
        self.state
    }
}

fn ensure_directory(directory: &Path) -> Result<(), LockError> {
    match fs::create_dir_all(directory) {
        Ok(()) => Ok(()),
        // Raced with another creator.
        Err(_) if directory.is_dir() => Ok(()),
        Err(source) => Err(LockError::DirectoryUnavailable {
            path: directory.to_path_buf(),
            source,
        }),
    }
}

fn is_contended(err: &io::Error) -> bool {
    // fs2 on Linux may return Other instead of WouldBlock
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(unix)]
fn close(file: File) -> io::Result<()> {
    use std::os::fd::IntoRawFd;
    nix::unistd::close(file.into_raw_fd()).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn close(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory_and_sentinel() {
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("a/b/app");
        let mut lock = StorageLock::open(&storage).unwrap();
        assert!(storage.is_dir());
        assert!(storage.join(constants::LOCK_FILE_NAME).is_file());
        assert_eq!(lock.lock_path(), storage.join(constants::LOCK_FILE_NAME));
        assert_eq!(lock.directory(), storage);
        assert!(lock.is_acquired());
        lock.release().unwrap();
    }

    #[test]
    fn test_second_handle_not_acquired() {
        let dir = TempDir::new().unwrap();
        let mut first = StorageLock::open(dir.path()).unwrap();
        let mut second = StorageLock::open(dir.path()).unwrap();
        assert!(first.is_acquired());
        assert!(!second.is_acquired());
        assert_eq!(second.state(), Acquisition::NotAcquired);
        second.release().unwrap();
        first.release().unwrap();
    }

    #[test]
    fn test_is_acquired_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut lock = StorageLock::open(dir.path()).unwrap();
        for _ in 0..5 {
            assert!(lock.is_acquired());
        }
        assert_eq!(lock.state(), Acquisition::Acquired);
        lock.release().unwrap();
    }

    #[test]
    fn test_release_frees_lock_for_new_handle() {
        let dir = TempDir::new().unwrap();
        let first = StorageLock::open(dir.path()).unwrap();
        assert!(first.state().is_acquired());
        first.release().unwrap();

        let mut second = StorageLock::open(dir.path()).unwrap();
        assert!(second.is_acquired());
        second.release().unwrap();
    }

    #[test]
    fn test_requery_picks_up_freed_lock() {
        let dir = TempDir::new().unwrap();
        let first = StorageLock::open(dir.path()).unwrap();
        let mut second = StorageLock::open(dir.path()).unwrap();
        assert!(!second.is_acquired());

        first.release().unwrap();
        assert!(second.is_acquired());
        second.release().unwrap();
    }

    #[test]
    fn test_releasing_loser_keeps_holder_locked() {
        let dir = TempDir::new().unwrap();
        let holder = StorageLock::open(dir.path()).unwrap();
        let loser = StorageLock::open(dir.path()).unwrap();
        loser.release().unwrap();

        let mut third = StorageLock::open(dir.path()).unwrap();
        assert!(!third.is_acquired());
        third.release().unwrap();
        holder.release().unwrap();
    }

    #[test]
    fn test_drop_releases_lock() {
        let dir = TempDir::new().unwrap();
        {
            let lock = StorageLock::open(dir.path()).unwrap();
            assert!(lock.state().is_acquired());
        }
        let mut lock = StorageLock::open(dir.path()).unwrap();
        assert!(lock.is_acquired());
        lock.release().unwrap();
    }

    #[test]
    fn test_sentinel_survives_release_untouched() {
        let dir = TempDir::new().unwrap();
        let sentinel = dir.path().join(constants::LOCK_FILE_NAME);
        fs::write(&sentinel, b"previous owner").unwrap();

        let lock = StorageLock::open(dir.path()).unwrap();
        lock.release().unwrap();

        assert!(sentinel.is_file());
        assert_eq!(fs::read(&sentinel).unwrap(), b"previous owner");
    }

    #[test]
    fn test_path_is_a_file_is_directory_unavailable() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain");
        fs::write(&not_a_dir, b"").unwrap();

        let err = StorageLock::open(&not_a_dir).unwrap_err();
        assert!(matches!(err, LockError::DirectoryUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_parent_is_directory_unavailable() {
        if crate::util::privilege::is_root() {
            return; // root ignores directory permissions
        }
        let dir = TempDir::new().unwrap();
        crate::util::fs::set_permissions(dir.path(), 0o500).unwrap();

        let err = StorageLock::open(&dir.path().join("app")).unwrap_err();
        crate::util::fs::set_permissions(dir.path(), 0o700).unwrap();
        assert!(matches!(err, LockError::DirectoryUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_directory_is_lock_file_unavailable() {
        if crate::util::privilege::is_root() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("app");
        fs::create_dir(&storage).unwrap();
        crate::util::fs::set_permissions(&storage, 0o500).unwrap();

        let err = StorageLock::open(&storage).unwrap_err();
        crate::util::fs::set_permissions(&storage, 0o700).unwrap();
        assert!(matches!(err, LockError::LockFileUnavailable { .. }));
    }

    #[test]
    fn test_error_messages_name_path() {
        let err = LockError::DirectoryUnavailable {
            path: PathBuf::from("/srv/data"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "storage directory can't be created: /srv/data");
    }
}
