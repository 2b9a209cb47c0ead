//! Incremental history bundles: export and inspection

mod export;
pub mod format;
mod verify;

pub use export::BundleExporter;
pub use format::{BundleHeader, Prerequisite};
pub use verify::{list_bundle_heads, read_bundle_header, verify_bundle, BundleVerification};
