//! Version ordering for Maven-style version strings.
//!
//! These versions are not semver: segment counts vary (`1`, `1.2`,
//! `1.2.0.4`) and qualifiers ride after hyphens (`1.0-alpha1`). The ordering
//! implemented here:
//!
//! - tokens are split on `.` and `-`;
//! - digit-only tokens compare numerically, so `2 < 10`;
//! - qualifier tokens compare lexicographically, case-insensitive;
//! - a numeric token outranks a qualifier at the same position;
//! - trailing zero tokens are neutral (`1.0 == 1.0.0`), a remaining positive
//!   numeric token makes its side greater, and a remaining qualifier makes
//!   its side smaller (`1.0-alpha < 1.0`).

pub mod matcher;

pub use matcher::{best_match, StandardMatcher, VersionMatcher, VersionQuery};

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(u64),
    Qualifier(String),
}

impl Token {
    fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Qualifier(raw.to_ascii_lowercase()),
        }
    }

    fn cmp(&self, other: &Token) -> Ordering {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a.cmp(b),
            (Token::Qualifier(a), Token::Qualifier(b)) => a.cmp(b),
            (Token::Number(_), Token::Qualifier(_)) => Ordering::Greater,
            (Token::Qualifier(_), Token::Number(_)) => Ordering::Less,
        }
    }

    /// How a token left over after the other version ran out tips the scale.
    fn rank_unpaired(&self) -> Ordering {
        match self {
            Token::Number(0) => Ordering::Equal,
            Token::Number(_) => Ordering::Greater,
            Token::Qualifier(_) => Ordering::Less,
        }
    }
}

/// A parsed Maven-style version.
///
/// Equality follows the ordering, not the raw text: `1.0` and `1.0.0` are
/// equal. The original string is preserved for display.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    raw: String,
    tokens: Vec<Token>,
}

impl MavenVersion {
    /// Parse a version string. Parsing is infallible: anything that is not a
    /// dotted numeric segment becomes a qualifier token.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(['.', '-'])
            .filter(|part| !part.is_empty())
            .map(Token::parse)
            .collect();
        MavenVersion {
            raw: raw.to_string(),
            tokens,
        }
    }

    /// Get the original version string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let paired = self.tokens.len().min(other.tokens.len());
        for i in 0..paired {
            let ord = self.tokens[i].cmp(&other.tokens[i]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        for token in &self.tokens[paired..] {
            match token.rank_unpaired() {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        for token in &other.tokens[paired..] {
            match token.rank_unpaired() {
                Ordering::Equal => continue,
                ord => return ord.reverse(),
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two raw version strings under the ordering above.
pub fn compare(a: &str, b: &str) -> Ordering {
    MavenVersion::parse(a).cmp(&MavenVersion::parse(b))
}
