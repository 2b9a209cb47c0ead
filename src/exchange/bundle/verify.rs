//! Read-only inspection of bundle files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::model::BranchRef;
use crate::repository::{io_err, ObjectStore, Result};

use super::format::{BundleHeader, Prerequisite};

/// Result of checking a bundle against a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleVerification {
    pub header: BundleHeader,
    /// Prerequisites the repository does not have
    pub missing: Vec<Prerequisite>,
}

impl BundleVerification {
    /// Whether the bundle can be fetched into the repository
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn read_bundle_header(path: &Path) -> Result<BundleHeader> {
    let file = File::open(path).map_err(|e| io_err(format!("opening {}", path.display()), e))?;
    BundleHeader::read_from(&mut BufReader::new(file))
}

/// Refs a bundle carries, in the order it lists them
pub fn list_bundle_heads(path: &Path) -> Result<Vec<BranchRef>> {
    Ok(read_bundle_header(path)?.refs)
}

/// Check which of a bundle's prerequisites `store` is missing. Touches no refs or objects.
pub fn verify_bundle(store: &impl ObjectStore, path: &Path) -> Result<BundleVerification> {
    let header = read_bundle_header(path)?;
    let mut missing = Vec::new();
    for prereq in &header.prerequisites {
        if !store.contains(prereq.id)? {
            missing.push(prereq.clone());
        }
    }
    Ok(BundleVerification { header, missing })
}
