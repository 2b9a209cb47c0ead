//! Object store trait
//!
//! The commit-graph, ref and working-copy primitives the exchange components
//! are written against. [`GitStore`](super::GitStore) is the libgit2-backed
//! implementation; tests may substitute their own.

use git2::Oid;
use std::io::Write;

use crate::model::{BranchRef, CheckoutTarget, CommitInfo, RemoteDirection};

use super::error::Result;
use super::refspec::RefSpec;

pub trait ObjectStore {
    /// Display name of the working tree (its directory name)
    fn working_tree_name(&self) -> String;

    /// Resolve a commit, failing with `ObjectNotFound` if it does not exist
    fn resolve_commit(&self, id: Oid) -> Result<CommitInfo>;

    /// Resolve a revision expression (`HEAD`, a branch, a hex prefix) to a commit id
    fn resolve_revision(&self, spec: &str) -> Result<Oid>;

    /// Ordered parents of a commit
    fn parents_of(&self, id: Oid) -> Result<Vec<Oid>> {
        Ok(self.resolve_commit(id)?.parents)
    }

    /// Whether `ancestor` is reachable from `descendant` along parent edges.
    /// A commit counts as its own ancestor.
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;

    /// Depth-first walk of every file in the commit's tree, yielding the
    /// slash-separated relative path and the blob id. Directories are not yielded.
    fn walk_tree(
        &self,
        commit: &CommitInfo,
        visit: &mut dyn FnMut(&str, Oid) -> Result<()>,
    ) -> Result<()>;

    /// Stream a blob's content into `out`, returning the number of bytes written
    fn read_blob(&self, id: Oid, out: &mut dyn Write) -> Result<u64>;

    /// Whether an object with this id exists in the store
    fn contains(&self, id: Oid) -> Result<bool>;

    fn list_local_branches(&self) -> Result<Vec<BranchRef>>;

    /// Remote-tracking branches of `remote` (`refs/remotes/{remote}/*`)
    fn list_remote_branches(&self, remote: &str) -> Result<Vec<BranchRef>>;

    /// Write a pack holding every object reachable from `tips` but not from
    /// `exclude`. Returns the number of objects written.
    fn write_pack(&self, tips: &[Oid], exclude: &[Oid], out: &mut dyn Write) -> Result<usize>;

    fn has_remote(&self, name: &str) -> Result<bool>;

    fn register_remote(&self, name: &str, url: &str) -> Result<()>;

    fn set_remote_url(&self, name: &str, url: &str, direction: RemoteDirection) -> Result<()>;

    /// Fetch from a registered remote, updating refs per `refspec`.
    /// Returns the names of the refs that were written.
    fn fetch(&self, remote: &str, refspec: &RefSpec) -> Result<Vec<String>>;

    fn checkout(&self, target: &CheckoutTarget) -> Result<()>;

    /// True when there are no staged, unstaged or untracked (non-ignored) changes
    fn working_copy_is_clean(&self) -> Result<bool>;
}
