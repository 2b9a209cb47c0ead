//! Bundle exporter
//!
//! Packs a base commit plus everything built on it by local branches. Parents
//! of the base commit become prerequisites, so their history is left out.

use git2::Oid;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::exchange::archive::create_parent_dirs;
use crate::exchange::config::ExchangeConfig;
use crate::exchange::progress::{NoopProgress, ProgressReporter};
use crate::model::{BranchRef, BundleExportResult};
use crate::repository::{io_err, ObjectStore, Result};
use crate::util::short_hash;

use super::format::{BundleHeader, Prerequisite};

pub struct BundleExporter<'a, S: ObjectStore> {
    store: &'a S,
    config: &'a ExchangeConfig,
    progress: &'a dyn ProgressReporter,
}

impl<'a, S: ObjectStore> BundleExporter<'a, S> {
    pub fn new(store: &'a S, config: &'a ExchangeConfig) -> Self {
        Self {
            store,
            config,
            progress: &NoopProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Work out what a bundle for `base` would contain, without writing it
    pub fn plan(&self, base: Oid) -> Result<BundleHeader> {
        let base_info = self.store.resolve_commit(base)?;

        let branches = self.store.list_local_branches()?;
        let pb = self.progress.start("Checking branches", branches.len() as u64);
        let mut refs = Vec::new();
        for branch in branches {
            pb.advance(0);
            if self.store.is_ancestor(base, branch.target)? {
                debug!(branch = %branch.name, tip = %branch.target, "branch descends from base");
                refs.push(branch);
            } else {
                debug!(branch = %branch.name, "branch excluded");
            }
        }
        pb.finish();

        if refs.is_empty() {
            let name = format!("{}{}", self.config.bundle_base_prefix, short_hash(base));
            debug!(synthetic_ref = %name, "no branch contains base commit, using synthetic ref");
            refs.push(BranchRef::new(name, base));
        }

        if base_info.is_root() {
            debug!(commit = %base, "root commit, bundle is self-contained");
        }
        // Every parent must be resolvable here; it is both a prerequisite and the
        // boundary of the pack
        let mut prerequisites = Vec::with_capacity(base_info.parents.len());
        for parent in &base_info.parents {
            let info = self.store.resolve_commit(*parent)?;
            debug!(prerequisite = %parent, "assuming parent is present at destination");
            prerequisites.push(Prerequisite {
                id: *parent,
                comment: info.summary,
            });
        }

        Ok(BundleHeader {
            prerequisites,
            refs,
        })
    }

    /// Export `base` and every local branch descending from it into a bundle at `output`.
    ///
    /// Requires exclusive access to the working copy for the duration of the call.
    /// Blocking; run it off any latency-sensitive thread. On failure a partially
    /// written `output` may remain and must be discarded.
    pub fn export(&self, base: Oid, output: &Path) -> Result<BundleExportResult> {
        let started = Instant::now();
        info!(commit = %base, output = %output.display(), "exporting bundle");
        let header = self.plan(base)?;

        create_parent_dirs(output)?;
        let file = File::create(output)
            .map_err(|e| io_err(format!("creating {}", output.display()), e))?;
        let mut writer = BufWriter::new(file);
        header
            .write_to(&mut writer)
            .map_err(|e| io_err(format!("writing header of {}", output.display()), e))?;

        let mut seen = FxHashSet::default();
        let tips: Vec<Oid> = header
            .refs
            .iter()
            .map(|r| r.target)
            .filter(|oid| seen.insert(*oid))
            .collect();
        let exclude: Vec<Oid> = header.prerequisites.iter().map(|p| p.id).collect();
        let objects = self.store.write_pack(&tips, &exclude, &mut writer)?;
        writer
            .flush()
            .map_err(|e| io_err(format!("flushing {}", output.display()), e))?;

        info!(
            refs = header.refs.len(),
            prerequisites = header.prerequisites.len(),
            objects,
            elapsed = ?started.elapsed(),
            "bundle written"
        );
        Ok(BundleExportResult {
            included_refs_count: header.refs.len(),
            output_file: output.to_path_buf(),
        })
    }
}
