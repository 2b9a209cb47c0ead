//! Choosing which imported ref to check out

use crate::model::BranchRef;

use super::config::TieBreak;

/// Pick the ref to recommend for checkout.
///
/// The first suffix in `preference` that any ref ends with wins; within a
/// suffix the smallest name wins. With no suffix match, `tie_break` decides.
/// Returns `None` only for an empty input.
pub fn select_branch<'a>(
    refs: &'a [BranchRef],
    preference: &[String],
    tie_break: TieBreak,
) -> Option<&'a BranchRef> {
    for suffix in preference {
        let matched = refs
            .iter()
            .filter(|r| r.name.ends_with(suffix.as_str()))
            .min_by(|a, b| a.name.cmp(&b.name));
        if matched.is_some() {
            return matched;
        }
    }

    match tie_break {
        TieBreak::Lexicographic => refs.iter().min_by(|a, b| a.name.cmp(&b.name)),
        TieBreak::FirstListed => refs.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeConfig;
    use git2::Oid;

    fn refs(names: &[&str]) -> Vec<BranchRef> {
        names
            .iter()
            .map(|n| BranchRef::new(format!("refs/remotes/bundle_x/{n}"), Oid::zero()))
            .collect()
    }

    fn pick(names: &[&str], tie_break: TieBreak) -> Option<String> {
        let refs = refs(names);
        let preference = ExchangeConfig::default().branch_preference;
        select_branch(&refs, &preference, tie_break).map(|r| r.name.clone())
    }

    #[test]
    fn test_preference_order() {
        assert_eq!(
            pick(&["develop", "master", "main"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/main")
        );
        assert_eq!(
            pick(&["develop", "trunk", "master"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/master")
        );
        assert_eq!(
            pick(&["zeta", "develop"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/develop")
        );
    }

    #[test]
    fn test_suffix_matches_nested_names() {
        assert_eq!(
            pick(&["team/main", "alpha"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/team/main")
        );
        // "domain" does not end with "/main"
        assert_eq!(
            pick(&["domain", "beta"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/beta")
        );
    }

    #[test]
    fn test_tie_break() {
        assert_eq!(
            pick(&["zeta", "alpha", "mid"], TieBreak::Lexicographic).as_deref(),
            Some("refs/remotes/bundle_x/alpha")
        );
        assert_eq!(
            pick(&["zeta", "alpha", "mid"], TieBreak::FirstListed).as_deref(),
            Some("refs/remotes/bundle_x/zeta")
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(pick(&[], TieBreak::Lexicographic), None);
    }
}
