//! Tunables shared by the exporters and the importer.

use serde::{Deserialize, Serialize};

/// Deflate level used for archive entries: moderate, not maximum
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

pub const DEFAULT_BUNDLE_BASE_PREFIX: &str = "refs/heads/bundle-base/";

pub const DEFAULT_REMOTE_FALLBACK: &str = "bundle_import";

/// How to choose among imported refs when none matches a preferred suffix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Smallest ref name in byte order
    #[default]
    Lexicographic,
    /// First ref in the order the store listed them
    FirstListed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub compression_level: i64,
    /// Ref-name suffixes to prefer for checkout, most preferred first
    pub branch_preference: Vec<String>,
    pub tie_break: TieBreak,
    /// Namespace for the synthetic ref written when no branch descends from the base commit
    pub bundle_base_prefix: String,
    /// Remote name used when the artifact's file name yields nothing usable
    pub remote_fallback: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            branch_preference: ["/main", "/master", "/trunk", "/develop"]
                .into_iter()
                .map(String::from)
                .collect(),
            tie_break: TieBreak::default(),
            bundle_base_prefix: DEFAULT_BUNDLE_BASE_PREFIX.to_string(),
            remote_fallback: DEFAULT_REMOTE_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let raw = r#"{"compression_level": 9, "tie_break": "first_listed"}"#;
        let config: ExchangeConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.compression_level, 9);
        assert_eq!(config.tie_break, TieBreak::FirstListed);
        assert_eq!(config.branch_preference[0], "/main");
        assert_eq!(config.bundle_base_prefix, "refs/heads/bundle-base/");
    }
}
