//! Running exchange operations off the async runtime

use std::path::PathBuf;

use crate::repository::{io_err, GitStore, Result};

use super::guard::OperationGuard;

/// Open the repository at `repo_path`, take its [`OperationGuard`] and run `op`
/// on tokio's blocking pool. The guard is released when `op` returns.
pub async fn run_blocking<T, F>(repo_path: PathBuf, op: F) -> Result<T>
where
    F: FnOnce(&GitStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let store = GitStore::open(&repo_path)?;
        let _guard = OperationGuard::acquire(store.git_dir())?;
        op(&store)
    })
    .await
    .map_err(|e| io_err("joining background snapshot task", e))?
}
