//! libgit2-backed object store

use git2::build::CheckoutBuilder;
use git2::{BranchType, ObjectType, Oid, Repository, StatusOptions};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::exchange::bundle::format::{BundleHeader, PACK_SIGNATURE};
use crate::model::{BranchRef, CheckoutTarget, CommitInfo, RemoteDirection};

use super::error::{io_err, lookup_err, ExchangeError, Result};
use super::refspec::RefSpec;
use super::store::ObjectStore;

/// Object store over a git repository opened with libgit2
pub struct GitStore {
    repo: Repository,
}

impl GitStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self { repo })
    }

    /// Path of the `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    fn walk_tree_recursive(
        &self,
        tree_id: Oid,
        prefix: &mut String,
        visit: &mut dyn FnMut(&str, Oid) -> Result<()>,
    ) -> Result<()> {
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| lookup_err(tree_id, e))?;

        for entry in tree.iter() {
            let base_len = prefix.len();
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(&String::from_utf8_lossy(entry.name_bytes()));

            match entry.kind() {
                Some(ObjectType::Blob) => visit(prefix, entry.id())?,
                Some(ObjectType::Tree) => self.walk_tree_recursive(entry.id(), prefix, visit)?,
                // Submodule gitlinks have no content in this repository
                _ => {}
            }

            prefix.truncate(base_len);
        }
        Ok(())
    }

    /// Stream the pack that follows a bundle header into the object database
    fn index_pack(&self, reader: &mut dyn BufRead) -> std::result::Result<(), String> {
        let head = reader.fill_buf().map_err(|e| e.to_string())?;
        if !head.starts_with(PACK_SIGNATURE) {
            return Err("bundle does not contain a pack stream".to_string());
        }
        let odb = self.repo.odb().map_err(|e| e.message().to_string())?;
        let mut writer = odb.packwriter().map_err(|e| e.message().to_string())?;
        std::io::copy(reader, &mut writer).map_err(|e| e.to_string())?;
        writer.commit().map_err(|e| e.message().to_string())?;
        Ok(())
    }
}

/// Filesystem path behind a remote URL that points at a bundle file
fn bundle_path_from_url(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
}

impl ObjectStore for GitStore {
    fn working_tree_name(&self) -> String {
        let root = self
            .repo
            .workdir()
            .unwrap_or_else(|| self.repo.path());
        root.components()
            .next_back()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty() && name != "/")
            .unwrap_or_else(|| "repository".to_string())
    }

    fn resolve_commit(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(id).map_err(|e| lookup_err(id, e))?;
        let when = commit.author().when();
        Ok(CommitInfo {
            id,
            tree: commit.tree_id(),
            parents: commit.parent_ids().collect(),
            time: when.seconds(),
            offset_minutes: when.offset_minutes(),
            summary: commit.summary().unwrap_or("").to_string(),
        })
    }

    fn resolve_revision(&self, spec: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|e| lookup_err(spec, e))?;
        let commit = object.peel_to_commit().map_err(|e| lookup_err(spec, e))?;
        Ok(commit.id())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn walk_tree(
        &self,
        commit: &CommitInfo,
        visit: &mut dyn FnMut(&str, Oid) -> Result<()>,
    ) -> Result<()> {
        let mut prefix = String::with_capacity(256);
        self.walk_tree_recursive(commit.tree, &mut prefix, visit)
    }

    fn read_blob(&self, id: Oid, out: &mut dyn Write) -> Result<u64> {
        let blob = self.repo.find_blob(id).map_err(|e| lookup_err(id, e))?;
        let content = blob.content();
        out.write_all(content)
            .map_err(|e| io_err(format!("copying blob {id}"), e))?;
        Ok(content.len() as u64)
    }

    fn contains(&self, id: Oid) -> Result<bool> {
        Ok(self.repo.odb()?.exists(id))
    }

    fn list_local_branches(&self) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();
        for item in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = item?;
            let reference = branch.get();
            match (reference.name(), reference.target()) {
                (Some(name), Some(target)) => branches.push(BranchRef::new(name, target)),
                _ => debug!("skipping branch with non-UTF-8 name or symbolic target"),
            }
        }
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn list_remote_branches(&self, remote: &str) -> Result<Vec<BranchRef>> {
        let prefix = format!("refs/remotes/{remote}/");
        let mut branches = Vec::new();
        for item in self.repo.references_glob(&format!("{prefix}*"))? {
            let reference = item?;
            let (Some(name), Some(target)) = (reference.name(), reference.target()) else {
                // Symbolic refs such as refs/remotes/<remote>/HEAD
                continue;
            };
            if name.starts_with(&prefix) {
                branches.push(BranchRef::new(name, target));
            }
        }
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn write_pack(&self, tips: &[Oid], exclude: &[Oid], out: &mut dyn Write) -> Result<usize> {
        let mut walk = self.repo.revwalk()?;
        for tip in tips {
            walk.push(*tip).map_err(|e| lookup_err(tip, e))?;
        }
        for hidden in exclude {
            walk.hide(*hidden).map_err(|e| lookup_err(hidden, e))?;
        }

        let mut builder = self.repo.packbuilder()?;
        builder.insert_walk(&mut walk)?;

        let mut write_error = None;
        let result = builder.foreach(|chunk| match out.write_all(chunk) {
            Ok(()) => true,
            Err(e) => {
                write_error = Some(e);
                false
            }
        });
        if let Some(e) = write_error {
            return Err(io_err("writing pack stream", e));
        }
        result?;
        Ok(builder.object_count())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.repo.remotes()?.iter().flatten().any(|r| r == name))
    }

    fn register_remote(&self, name: &str, url: &str) -> Result<()> {
        self.repo.remote(name, url)?;
        Ok(())
    }

    fn set_remote_url(&self, name: &str, url: &str, direction: RemoteDirection) -> Result<()> {
        match direction {
            RemoteDirection::Fetch => self.repo.remote_set_url(name, url)?,
            RemoteDirection::Push => self.repo.remote_set_pushurl(name, Some(url))?,
        }
        Ok(())
    }

    fn fetch(&self, remote: &str, refspec: &RefSpec) -> Result<Vec<String>> {
        let fail = |reason: String| ExchangeError::FetchFailure {
            remote: remote.to_string(),
            reason,
        };

        let url = {
            let found = self
                .repo
                .find_remote(remote)
                .map_err(|e| fail(e.message().to_string()))?;
            found
                .url()
                .map(str::to_string)
                .ok_or_else(|| fail("remote has no URL".to_string()))?
        };
        let path = bundle_path_from_url(&url);
        let file =
            File::open(&path).map_err(|e| fail(format!("cannot open {}: {e}", path.display())))?;
        let mut reader = BufReader::new(file);
        let header = BundleHeader::read_from(&mut reader).map_err(|e| fail(e.to_string()))?;

        let mut missing = Vec::new();
        for prereq in &header.prerequisites {
            if !self.contains(prereq.id)? {
                missing.push(prereq.id.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(fail(format!(
                "repository lacks prerequisite commits: {}",
                missing.join(", ")
            )));
        }

        let updates: Vec<(String, Oid)> = header
            .refs
            .iter()
            .filter_map(|r| match refspec.map(&r.name) {
                Some(dst) => Some((dst, r.target)),
                None => {
                    debug!(bundle_ref = %r.name, %refspec, "bundle ref outside fetched namespace");
                    None
                }
            })
            .collect();

        self.index_pack(&mut reader).map_err(fail)?;

        for (dst, target) in &updates {
            if self.repo.find_commit(*target).is_err() {
                return Err(fail(format!(
                    "{dst} points at {target}, which the pack does not contain"
                )));
            }
            if !refspec.is_force() {
                if let Ok(existing) = self.repo.refname_to_id(dst) {
                    if existing != *target && !self.is_ancestor(existing, *target)? {
                        return Err(fail(format!("non-fast-forward update of {dst}")));
                    }
                }
            }
        }

        let log_message = format!("fetch: bundle {}", path.display());
        let mut written = Vec::with_capacity(updates.len());
        for (dst, target) in updates {
            self.repo.reference(&dst, target, true, &log_message)?;
            written.push(dst);
        }
        if written.is_empty() {
            warn!(remote, "bundle fetch updated no refs");
        }
        Ok(written)
    }

    fn checkout(&self, target: &CheckoutTarget) -> Result<()> {
        let mut opts = CheckoutBuilder::new();
        opts.safe().recreate_missing(true);

        match target {
            CheckoutTarget::Branch {
                upstream,
                local_branch,
            } => {
                let commit = self
                    .repo
                    .find_commit(upstream.target)
                    .map_err(|e| lookup_err(upstream.target, e))?;
                let mut branch = self.repo.branch(local_branch, &commit, false)?;
                let upstream_name = upstream
                    .name
                    .strip_prefix("refs/remotes/")
                    .unwrap_or(&upstream.name);
                branch.set_upstream(Some(upstream_name))?;
                let head_ref = format!("refs/heads/{local_branch}");

                self.repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
                self.repo.set_head(&head_ref)?;
            }
            CheckoutTarget::Detached(id) => {
                let commit = self.repo.find_commit(*id).map_err(|e| lookup_err(id, e))?;
                self.repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
                self.repo.set_head_detached(*id)?;
            }
        }
        Ok(())
    }

    fn working_copy_is_clean(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses.is_empty())
    }
}
