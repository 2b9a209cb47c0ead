//! Bundle importer
//!
//! Registers the artifact as a remote, fetches its branches into
//! remote-tracking refs, and then decides whether the working copy may be
//! updated. Local branches are never moved by an import.

use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::model::{CheckoutTarget, ImportOutcome, RemoteDirection};
use crate::repository::{io_err, ObjectStore, RefSpec, Result};

use super::config::ExchangeConfig;
use super::remote_name::derive_remote_name;
use super::select::select_branch;

pub struct BundleImporter<'a, S: ObjectStore> {
    store: &'a S,
    config: &'a ExchangeConfig,
}

impl<'a, S: ObjectStore> BundleImporter<'a, S> {
    pub fn new(store: &'a S, config: &'a ExchangeConfig) -> Self {
        Self { store, config }
    }

    /// Remote name an import of `artifact` registers
    pub fn remote_name(&self, artifact: &Path) -> String {
        derive_remote_name(artifact, &self.config.remote_fallback)
    }

    /// Import the bundle at `artifact` into the store's working copy.
    ///
    /// Requires exclusive access to the working copy for the duration of the call.
    /// Blocking; run it off any latency-sensitive thread. If the fetch fails the
    /// remote registration may remain, but the working tree is left untouched.
    pub fn import(&self, artifact: &Path) -> Result<ImportOutcome> {
        let location = std::fs::canonicalize(artifact)
            .map_err(|e| io_err(format!("locating {}", artifact.display()), e))?;
        let url = location.to_string_lossy();
        let remote = self.remote_name(artifact);
        info!(artifact = %location.display(), remote = %remote, "importing bundle");
        let refspec = RefSpec::remote_tracking(&remote)?;

        if self.store.has_remote(&remote)? {
            debug!(remote = %remote, "remote already registered");
        } else {
            self.store.register_remote(&remote, &url)?;
        }
        self.store.set_remote_url(&remote, &url, RemoteDirection::Fetch)?;
        self.store.set_remote_url(&remote, &url, RemoteDirection::Push)?;

        let updated: FxHashSet<String> =
            self.store.fetch(&remote, &refspec)?.into_iter().collect();
        debug!(remote = %remote, refs = updated.len(), "fetch complete");

        // Refs left behind by an earlier artifact with the same name are not candidates
        let (imported, stale): (Vec<_>, Vec<_>) = self
            .store
            .list_remote_branches(&remote)?
            .into_iter()
            .partition(|r| updated.contains(&r.name));
        if !stale.is_empty() {
            debug!(
                remote = %remote,
                stale = stale.len(),
                "ignoring refs not carried by this bundle"
            );
        }
        let Some(selected) = select_branch(
            &imported,
            &self.config.branch_preference,
            self.config.tie_break,
        ) else {
            info!(remote = %remote, "bundle has no branches");
            return Ok(ImportOutcome::NoBranchesFound);
        };
        let count = imported.len();
        let branch = selected
            .short_name(refspec.dst_prefix())
            .unwrap_or(selected.name.as_str())
            .to_string();

        if !self.store.working_copy_is_clean()? {
            info!(remote = %remote, refs = count, "working copy has changes, leaving it untouched");
            return Ok(ImportOutcome::ImportedNotApplied { count });
        }

        let outcome = if self.store.list_local_branches()?.is_empty() {
            self.store.checkout(&CheckoutTarget::Branch {
                upstream: selected.clone(),
                local_branch: branch.clone(),
            })?;
            ImportOutcome::AppliedClean { branch, count }
        } else {
            self.store.checkout(&CheckoutTarget::Detached(selected.target))?;
            ImportOutcome::AppliedDetached { branch, count }
        };
        info!(
            remote = %remote,
            selected = %selected.name,
            working_tree_changed = outcome.touched_working_tree(),
            ?outcome,
            "bundle imported"
        );
        Ok(outcome)
    }
}
