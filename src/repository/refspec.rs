//! Minimal fetch refspec: `[+]<src>:<dst>` with at most one trailing `*` glob.

use std::fmt;

use super::error::{ExchangeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSpec {
    src: String,
    dst: String,
    force: bool,
}

impl RefSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let (force, body) = match spec.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let (src, dst) = body
            .split_once(':')
            .ok_or_else(|| ExchangeError::InvalidRefSpec(format!("missing ':' in {spec}")))?;
        if src.is_empty() || dst.is_empty() {
            return Err(ExchangeError::InvalidRefSpec(format!("empty side in {spec}")));
        }
        if dst.contains(':') || [src, dst].iter().any(|side| side.contains("//")) {
            return Err(ExchangeError::InvalidRefSpec(format!("malformed ref name in {spec}")));
        }
        let glob_count = |s: &str| s.matches('*').count();
        let src_glob = glob_count(src);
        let dst_glob = glob_count(dst);
        let trailing = src.ends_with('*') && dst.ends_with('*');
        if src_glob != dst_glob || src_glob > 1 || (src_glob == 1 && !trailing) {
            return Err(ExchangeError::InvalidRefSpec(format!(
                "unsupported pattern: {spec}"
            )));
        }
        Ok(Self {
            src: src.to_string(),
            dst: dst.to_string(),
            force,
        })
    }

    /// Refspec that maps every branch head to `refs/remotes/{remote}/*`, forced.
    /// Fails when `remote` cannot form a ref namespace.
    pub fn remote_tracking(remote: &str) -> Result<Self> {
        if remote.is_empty() {
            return Err(ExchangeError::InvalidRefSpec("empty remote name".to_string()));
        }
        Self::parse(&format!("+refs/heads/*:refs/remotes/{remote}/*"))
    }

    pub fn is_force(&self) -> bool {
        self.force
    }

    /// Destination name for `src_ref`, or `None` if the refspec does not match it
    pub fn map(&self, src_ref: &str) -> Option<String> {
        match self.src.strip_suffix('*') {
            Some(prefix) => {
                let rest = src_ref.strip_prefix(prefix)?;
                if rest.is_empty() {
                    return None;
                }
                let dst_prefix = self.dst.strip_suffix('*').unwrap_or(&self.dst);
                Some(format!("{dst_prefix}{rest}"))
            }
            None => (src_ref == self.src).then(|| self.dst.clone()),
        }
    }

    /// Namespace prefix of the destination side, e.g. `refs/remotes/origin/`
    pub fn dst_prefix(&self) -> &str {
        self.dst.strip_suffix('*').unwrap_or(&self.dst)
    }
}

impl fmt::Display for RefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            f.write_str("+")?;
        }
        write!(f, "{}:{}", self.src, self.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_tracking_maps_heads() {
        let spec = RefSpec::remote_tracking("bundle_x").unwrap();
        assert!(spec.is_force());
        assert_eq!(spec.to_string(), "+refs/heads/*:refs/remotes/bundle_x/*");
        assert_eq!(
            spec.map("refs/heads/main").as_deref(),
            Some("refs/remotes/bundle_x/main")
        );
        assert_eq!(
            spec.map("refs/heads/feature/nested").as_deref(),
            Some("refs/remotes/bundle_x/feature/nested")
        );
        assert_eq!(spec.map("refs/tags/v1"), None);
        assert_eq!(spec.map("refs/heads/"), None);
        assert_eq!(spec.dst_prefix(), "refs/remotes/bundle_x/");
    }

    #[test]
    fn test_parse_round_trips_display() {
        let spec = RefSpec::parse("+refs/heads/*:refs/remotes/origin/*").unwrap();
        assert_eq!(spec, RefSpec::remote_tracking("origin").unwrap());

        let exact = RefSpec::parse("refs/heads/main:refs/remotes/o/main").unwrap();
        assert!(!exact.is_force());
        assert_eq!(exact.map("refs/heads/main").as_deref(), Some("refs/remotes/o/main"));
        assert_eq!(exact.map("refs/heads/dev"), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(RefSpec::parse("refs/heads/main").is_err());
        assert!(RefSpec::parse(":refs/remotes/o/main").is_err());
        assert!(RefSpec::parse("refs/heads/*:refs/remotes/o/main").is_err());
        assert!(RefSpec::parse("refs/*/x:refs/remotes/*/x").is_err());
        assert!(RefSpec::parse("refs/heads/*:refs/remotes/a:b/*").is_err());
    }

    #[test]
    fn test_remote_tracking_rejects_unusable_names() {
        for remote in ["", "a*b", "a:b", "a//b"] {
            assert!(
                matches!(
                    RefSpec::remote_tracking(remote),
                    Err(ExchangeError::InvalidRefSpec(_))
                ),
                "accepted {remote:?}"
            );
        }
    }
}
