//! Single-operation guard
//!
//! The exchange components assume nothing else mutates the repository while
//! they run. Hosts enforce that by holding an [`OperationGuard`], a lock file
//! in the git directory that only one holder can create.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::repository::{io_err, ExchangeError, Result};

pub const LOCK_FILE_NAME: &str = "snapshot-exchange.lock";

#[derive(Debug)]
pub struct OperationGuard {
    path: PathBuf,
}

impl OperationGuard {
    /// Take the lock for the repository whose git directory is `git_dir`.
    /// Fails with [`ExchangeError::Busy`] if another operation holds it.
    pub fn acquire(git_dir: &Path) -> Result<Self> {
        let path = git_dir.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(ExchangeError::Busy(path)),
            Err(e) => return Err(io_err(format!("creating {}", path.display()), e)),
        };
        // The pid is informational, the file's existence is the lock
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            warn!(path = %path.display(), error = %e, "could not record pid in lock file");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release operation lock");
        }
    }
}
