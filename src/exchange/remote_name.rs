//! Remote-name derivation for imported artifacts
//!
//! The same artifact file name always yields the same remote name, so
//! re-importing updates one remote instead of accumulating new ones.

use std::path::Path;

use crate::util::artifact_stem;

const PREFIX: &str = "bundle_";
const STEM_LIMIT: usize = 50;
const NAME_LIMIT: usize = 60;

/// Derive a remote name from an artifact path.
///
/// The file stem is reduced to alphanumerics, `.`, `_` and `-` (anything else
/// becomes `_`), cut to 50 characters and prefixed with `bundle_`. The result
/// is cut to 60 characters and trailing underscores are dropped. If nothing
/// usable remains, `fallback` is returned.
pub fn derive_remote_name(artifact: &Path, fallback: &str) -> String {
    let stem = artifact_stem(artifact);
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(STEM_LIMIT)
        .collect();

    if sanitized.is_empty() {
        return fallback.to_string();
    }

    let candidate: String = format!("{PREFIX}{sanitized}").chars().take(NAME_LIMIT).collect();
    let trimmed = candidate.trim_end_matches('_');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
