//! Commit graph and ref types shared by the exporters and the importer.

use git2::Oid;
use serde::Serialize;

/// A resolved commit: its id, root tree, ordered parents and authored time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    pub tree: Oid,
    pub parents: Vec<Oid>,
    /// Authored time in seconds since the Unix epoch
    pub time: i64,
    /// Offset of the authored time from UTC, in minutes
    pub offset_minutes: i32,
    pub summary: String,
}

impl CommitInfo {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// A named pointer into the commit graph (`refs/heads/...`, `refs/remotes/<remote>/...`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BranchRef {
    pub name: String,
    #[serde(serialize_with = "serialize_oid")]
    pub target: Oid,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// The name with the given namespace prefix removed, if it lives under it
    pub fn short_name<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        self.name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
    }
}

/// What a checkout should materialize in the working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// Create `local_branch` at the tip of `upstream`, track it, and make it HEAD
    Branch { upstream: BranchRef, local_branch: String },
    /// Materialize the commit's tree and detach HEAD at it
    Detached(Oid),
}

/// Which URL of a remote is being configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDirection {
    Fetch,
    Push,
}

pub(crate) fn serialize_oid<S: serde::Serializer>(oid: &Oid, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(oid)
}
