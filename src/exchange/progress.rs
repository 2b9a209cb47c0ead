//! Progress reporting for the export loops
//!
//! Each processed item (archive entry, candidate branch) is reported together
//! with the payload bytes it added to the output. Handles keep the running byte
//! total so callers can log it once the loop finishes, whether or not anything
//! is drawn on the terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::util::format_size;

/// A running progress display
pub trait ProgressHandle: Send + Sync {
    /// Record one processed item that wrote `bytes` to the output
    fn advance(&self, bytes: u64);

    /// Close the display and return the bytes recorded through `advance`
    fn finish(&self) -> u64;
}

/// Factory for progress handles
pub trait ProgressReporter: Send + Sync {
    /// Start a progress display. A `total` of 0 means the item count is not known
    /// up front (archive entries are streamed from the tree walk).
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle>;
}

/// Terminal progress through indicatif
pub struct IndicatifProgress;

impl IndicatifProgress {
    fn style(total: u64) -> ProgressStyle {
        if total == 0 {
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix}: {pos} entries {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        } else {
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix}: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-")
        }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        let bar = if total == 0 {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::new(total)
        };
        bar.set_style(Self::style(total));
        bar.set_prefix(label.to_string());
        Box::new(IndicatifHandle {
            bar,
            bytes: AtomicU64::new(0),
        })
    }
}

struct IndicatifHandle {
    bar: ProgressBar,
    bytes: AtomicU64,
}

impl ProgressHandle for IndicatifHandle {
    fn advance(&self, bytes: u64) {
        self.bar.inc(1);
        let written = self.bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;
        if written > 0 {
            self.bar.set_message(format!("({})", format_size(written)));
        }
    }

    fn finish(&self) -> u64 {
        self.bar.finish_and_clear();
        self.bytes.load(Ordering::Relaxed)
    }
}

/// Draws nothing; still counts bytes. Used by library callers and quiet runs.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(CountingHandle(AtomicU64::new(0)))
    }
}

struct CountingHandle(AtomicU64);

impl ProgressHandle for CountingHandle {
    fn advance(&self, bytes: u64) {
        self.0.fetch_add(bytes, Ordering::Relaxed);
    }

    fn finish(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Terminal progress only when `--verbose` is set
pub struct VerboseProgress {
    verbose: bool,
}

impl VerboseProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for VerboseProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        if self.verbose {
            IndicatifProgress.start(label, total)
        } else {
            NoopProgress.start(label, total)
        }
    }
}
