//! Version query matching.
//!
//! A version query is the version text a declaration carries. Three forms
//! are understood: an exact version, a `+` prefix pattern (`1.2.+`), and the
//! whole-range query (`+`, `latest`, or an empty string, which dependency
//! management is expected to pin later). Anything else is treated as an
//! exact version.

use crate::version::MavenVersion;

/// A parsed version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionQuery {
    /// Match only this literal version.
    Exact(String),
    /// Match versions under the stem: `1.2.+` matches `1.2` and `1.2.*`.
    Prefix(String),
    /// Match any version; the highest wins.
    Latest,
}

impl VersionQuery {
    /// Parse a query string.
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() || query == "+" || query.eq_ignore_ascii_case("latest") {
            return VersionQuery::Latest;
        }
        if let Some(stem) = query.strip_suffix('+') {
            if stem.is_empty() {
                return VersionQuery::Latest;
            }
            return VersionQuery::Prefix(stem.to_string());
        }
        VersionQuery::Exact(query.to_string())
    }

    /// Check whether `candidate` satisfies this query.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            VersionQuery::Exact(version) => candidate == version,
            VersionQuery::Prefix(stem) => match stem.strip_suffix('.') {
                // "1.2.+": the stem keeps its dot, so "1.2" and "1.2.3" match
                Some(base) => candidate == base || candidate.starts_with(stem),
                // "1+": require a segment boundary so "1" does not match "10"
                None => {
                    candidate == stem
                        || (candidate.starts_with(stem)
                            && candidate[stem.len()..].starts_with(['.', '-']))
                }
            },
            VersionQuery::Latest => true,
        }
    }
}

/// Version selection strategy.
///
/// The resolver only depends on this signature; the grammar above is the
/// default strategy, and embedders with a different descriptor ecosystem can
/// plug their own.
pub trait VersionMatcher {
    /// Pick the best concrete version for `query` among `candidates`, or
    /// none when nothing satisfies it.
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<String>;
}

/// Default matcher: filter by the query grammar, take the highest candidate
/// under Maven-style ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardMatcher;

impl VersionMatcher for StandardMatcher {
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<String> {
        let query = VersionQuery::parse(query);
        candidates
            .iter()
            .filter(|candidate| query.matches(candidate))
            .max_by_key(|candidate| MavenVersion::parse(candidate))
            .cloned()
    }
}

/// Match with the default strategy.
pub fn best_match(query: &str, candidates: &[String]) -> Option<String> {
    StandardMatcher.best_match(query, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(versions: &[&str]) -> Vec<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exact() {
        let pool = candidates(&["1.0", "1.2.0", "2.0"]);
        assert_eq!(best_match("1.2.0", &pool), Some("1.2.0".to_string()));
        assert_eq!(best_match("1.3.0", &pool), None);
    }

    #[test]
    fn test_latest() {
        let pool = candidates(&["1.0", "1.10", "1.2"]);
        assert_eq!(best_match("+", &pool), Some("1.10".to_string()));
        assert_eq!(best_match("latest", &pool), Some("1.10".to_string()));
        assert_eq!(best_match("", &pool), Some("1.10".to_string()));
    }

    #[test]
    fn test_prefix() {
        let pool = candidates(&["1.2.0", "1.2.9", "1.3.0", "10.0"]);
        assert_eq!(best_match("1.2.+", &pool), Some("1.2.9".to_string()));
        assert_eq!(best_match("1.+", &pool), Some("1.3.0".to_string()));
        assert_eq!(best_match("2.+", &pool), None);
    }

    #[test]
    fn test_prefix_segment_boundary() {
        // "1+" must not match "10.0"
        let query = VersionQuery::parse("1+");
        assert!(query.matches("1"));
        assert!(query.matches("1.5"));
        assert!(query.matches("1-beta"));
        assert!(!query.matches("10.0"));
    }

    #[test]
    fn test_empty_pool() {
        assert_eq!(best_match("+", &[]), None);
    }
}
