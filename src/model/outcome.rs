//! Result records handed back to callers.

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a bundle export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleExportResult {
    /// Number of refs written into the bundle; at least 1
    pub included_refs_count: usize,
    pub output_file: PathBuf,
}

/// Outcome of a bundle import
///
/// There is no partially-applied state: either the fetch completed and one of
/// these is returned, or the import failed with an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The repository had no branches; a local branch was created and checked out
    AppliedClean { branch: String, count: usize },
    /// The repository already had branches; HEAD was detached at the selected ref
    AppliedDetached { branch: String, count: usize },
    /// The working copy had local changes and was left untouched
    ImportedNotApplied { count: usize },
    /// The bundle carried no `refs/heads/*` refs
    NoBranchesFound,
}

impl ImportOutcome {
    /// Number of remote-tracking refs the import produced
    pub fn imported_count(&self) -> usize {
        match self {
            Self::AppliedClean { count, .. }
            | Self::AppliedDetached { count, .. }
            | Self::ImportedNotApplied { count } => *count,
            Self::NoBranchesFound => 0,
        }
    }

    /// Whether the working tree was changed by the import
    pub fn touched_working_tree(&self) -> bool {
        matches!(self, Self::AppliedClean { .. } | Self::AppliedDetached { .. })
    }
}
