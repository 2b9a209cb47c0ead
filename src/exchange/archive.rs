//! Archive exporter
//!
//! Writes every file of one commit's tree into a ZIP container under a single
//! root folder named `{working tree}-{short hash}`.

use git2::Oid;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::CommitInfo;
use crate::repository::{io_err, ObjectStore, Result};
use crate::util::short_hash;

use super::config::ExchangeConfig;
use super::progress::{NoopProgress, ProgressReporter};

pub struct ArchiveExporter<'a, S: ObjectStore> {
    store: &'a S,
    config: &'a ExchangeConfig,
    progress: &'a dyn ProgressReporter,
}

impl<'a, S: ObjectStore> ArchiveExporter<'a, S> {
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

    /// Name of the folder every entry of `commit`'s archive is placed under
    pub fn root_folder(&self, commit: Oid) -> String {
        format!("{}-{}", self.store.working_tree_name(), short_hash(commit))
    }

    /// Export `commit`'s tree to a ZIP file at `output`, returning the number of
    /// file entries written. An empty tree produces an empty archive.
    ///
    /// Requires exclusive access to the working copy for the duration of the call.
    /// Blocking; run it off any latency-sensitive thread. On failure a partially
    /// written `output` may remain and must be discarded.
    pub fn export(&self, commit: Oid, output: &Path) -> Result<usize> {
        let started = Instant::now();
        let info = self.store.resolve_commit(commit)?;
        let root = self.root_folder(commit);
        info!(commit = %commit, output = %output.display(), root = %root, "exporting archive");

        create_parent_dirs(output)?;
        let file = File::create(output)
            .map_err(|e| io_err(format!("creating {}", output.display()), e))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.config.compression_level))
            .last_modified_time(entry_timestamp(&info));

        let pb = self.progress.start("Archiving", 0);
        let mut count = 0usize;
        self.store.walk_tree(&info, &mut |path: &str, blob: Oid| {
            let entry_name = format!("{root}/{path}");
            zip.start_file(entry_name.as_str(), options)
                .map_err(|e| io_err(format!("starting entry {entry_name}"), e))?;
            let bytes = self.store.read_blob(blob, &mut zip)?;
            debug!(entry = %entry_name, bytes, "archived");
            count += 1;
            pb.advance(bytes);
            Ok(())
        })?;
        let bytes = pb.finish();

        zip.finish()
            .map_err(|e| io_err(format!("finishing {}", output.display()), e))?
            .into_inner()
            .map_err(|e| io_err(format!("flushing {}", output.display()), e.into_error()))?;

        info!(files = count, bytes, elapsed = ?started.elapsed(), "archive written");
        Ok(count)
    }
}

/// Create the missing parent directories of an output file
pub(crate) fn create_parent_dirs(output: &Path) -> Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| io_err(format!("creating directory {}", parent.display()), e)),
        _ => Ok(()),
    }
}

/// Entry timestamp: the commit's authored time in the author's local offset.
/// ZIP cannot represent times before 1980; those clamp to the format's epoch.
fn entry_timestamp(commit: &CommitInfo) -> zip::DateTime {
    let local = commit.time + i64::from(commit.offset_minutes) * 60;
    OffsetDateTime::from_unix_timestamp(local)
        .ok()
        .and_then(|dt| {
            zip::DateTime::from_date_and_time(
                u16::try_from(dt.year()).ok()?,
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second(),
            )
            .ok()
        })
        .unwrap_or_default()
}
