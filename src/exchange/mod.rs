//! Repository snapshot exchange
//!
//! # Components
//!
//! - **archive**: one commit's file tree as a ZIP container
//! - **bundle**: a commit plus its descendants on local branches as an
//!   incremental bundle, plus read-only inspection of bundle files
//! - **import**: fetching a bundle into remote-tracking refs and deciding
//!   how to present it to the working copy
//!
//! Supporting modules hold remote-name derivation, branch selection,
//! configuration, progress reporting and the single-operation guard.
//!
//! Every entry point requires exclusive access to the working copy while it
//! runs; hosts provide that with [`OperationGuard`] or their own mechanism.

pub mod archive;
pub mod bundle;
mod config;
mod guard;
pub mod import;
mod progress;
mod remote_name;
mod select;
mod task;

pub use archive::ArchiveExporter;
pub use bundle::{
    list_bundle_heads, read_bundle_header, verify_bundle, BundleExporter, BundleHeader,
    BundleVerification, Prerequisite,
};
pub use config::{ExchangeConfig, TieBreak};
pub use guard::{OperationGuard, LOCK_FILE_NAME};
pub use import::BundleImporter;
pub use progress::{
    IndicatifProgress, NoopProgress, ProgressHandle, ProgressReporter, VerboseProgress,
};
pub use remote_name::derive_remote_name;
pub use select::select_branch;
pub use task::run_blocking;

use git2::Oid;
use std::path::Path;

use crate::model::{BundleExportResult, ImportOutcome};
use crate::repository::{ObjectStore, Result};

/// Export `commit`'s tree as a ZIP at `output` with default settings.
/// Requires exclusive access to the working copy.
pub fn export_archive(store: &impl ObjectStore, commit: Oid, output: &Path) -> Result<usize> {
    let config = ExchangeConfig::default();
    ArchiveExporter::new(store, &config).export(commit, output)
}

/// Export `base` and its descendants as a bundle at `output` with default settings.
/// Requires exclusive access to the working copy.
pub fn export_bundle(
    store: &impl ObjectStore,
    base: Oid,
    output: &Path,
) -> Result<BundleExportResult> {
    let config = ExchangeConfig::default();
    BundleExporter::new(store, &config).export(base, output)
}

/// Import the bundle at `artifact` with default settings.
/// Requires exclusive access to the working copy.
pub fn import_bundle(store: &impl ObjectStore, artifact: &Path) -> Result<ImportOutcome> {
    let config = ExchangeConfig::default();
    BundleImporter::new(store, &config).import(artifact)
}
