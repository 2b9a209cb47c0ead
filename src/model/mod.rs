mod commit;
mod outcome;

pub use commit::{BranchRef, CheckoutTarget, CommitInfo, RemoteDirection};
pub use outcome::{BundleExportResult, ImportOutcome};
