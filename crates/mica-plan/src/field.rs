//! Dotted field paths and the prefix relation that governs index relevance.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// FieldPath
///
/// A dotted path into a document, e.g. `details.color`. Array operators
/// contribute paths relative to their parent; `concat` threads the parent
/// prefix through.
///

#[derive(
    Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize,
)]
pub struct FieldPath(String);

impl FieldPath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a parent prefix with a relative path. An empty prefix or an
    /// empty tail contributes no separator, so `{a: {$all: [{$elemMatch:
    /// {b: 1}}]}}` resolves to `a.b` rather than `a..b`.
    #[must_use]
    pub fn concat(prefix: &str, tail: &str) -> Self {
        if prefix.is_empty() {
            Self(tail.to_string())
        } else if tail.is_empty() {
            Self(prefix.to_string())
        } else {
            Self(format!("{prefix}.{tail}"))
        }
    }

    /// Whether one path is a literal dotted prefix of the other (or they are
    /// equal). An index on `a.b` is relevant to a predicate on `a.b.c` and
    /// vice versa.
    #[must_use]
    pub fn is_prefix_compatible(&self, other: &Self) -> bool {
        let (short, long) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };

        long == short || (long.starts_with(short.as_str()) && long.as_bytes()[short.len()] == b'.')
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_skips_empty_segments() {
        assert_eq!(FieldPath::concat("", "a").as_str(), "a");
        assert_eq!(FieldPath::concat("a", "").as_str(), "a");
        assert_eq!(FieldPath::concat("a", "b.c").as_str(), "a.b.c");
    }

    #[test]
    fn prefix_compatibility_respects_component_boundaries() {
        let ab = FieldPath::new("a.b");
        assert!(ab.is_prefix_compatible(&FieldPath::new("a.b.c")));
        assert!(ab.is_prefix_compatible(&FieldPath::new("a.b")));
        assert!(FieldPath::new("a.b.c").is_prefix_compatible(&ab));
        assert!(!ab.is_prefix_compatible(&FieldPath::new("a.bc")));
        assert!(!ab.is_prefix_compatible(&FieldPath::new("a.c")));
    }
}
