//! Index descriptors as supplied by the catalog snapshot.

use crate::field::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// KeyKind
///
/// How one key-pattern component stores its field. `Asc`/`Desc` are
/// ordinary btree components; the rest are special types with restricted
/// predicate compatibility.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum KeyKind {
    Asc,
    Desc,
    Hashed,
    TwoD,
    TwoDSphere,
    Text,
}

impl KeyKind {
    /// Whether this component is an ordinary, order-preserving btree key.
    #[must_use]
    pub const fn is_ordinary(self) -> bool {
        matches!(self, Self::Asc | Self::Desc)
    }

    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

///
/// KeyComponent
///
/// One (field path, kind) pair of a key pattern.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct KeyComponent {
    pub path: FieldPath,
    pub kind: KeyKind,
}

impl KeyComponent {
    #[must_use]
    pub fn new(path: impl Into<FieldPath>, kind: KeyKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    #[must_use]
    pub fn asc(path: impl Into<FieldPath>) -> Self {
        Self::new(path, KeyKind::Asc)
    }

    #[must_use]
    pub fn desc(path: impl Into<FieldPath>) -> Self {
        Self::new(path, KeyKind::Desc)
    }
}

///
/// IndexEntry
///
/// Descriptor for one index, immutable for the duration of planning. The
/// key pattern is never empty; `multikey` records that at least one indexed
/// field holds arrays, which forbids bound merging on this index.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub key_pattern: Vec<KeyComponent>,
    pub unique: bool,
    pub sparse: bool,
    pub multikey: bool,
}

impl IndexEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, key_pattern: Vec<KeyComponent>) -> Self {
        debug_assert!(!key_pattern.is_empty(), "index key pattern must not be empty");

        Self {
            name: name.into(),
            key_pattern,
            unique: false,
            sparse: false,
            multikey: false,
        }
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    #[must_use]
    pub const fn multikey(mut self) -> Self {
        self.multikey = true;
        self
    }

    /// The leading key component, the one that decides relevance.
    #[must_use]
    pub fn first_component(&self) -> &KeyComponent {
        &self.key_pattern[0]
    }

    /// Whether any component is a special (non-btree) type.
    #[must_use]
    pub fn has_special_component(&self) -> bool {
        self.key_pattern.iter().any(|c| !c.kind.is_ordinary())
    }
}

impl Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .key_pattern
            .iter()
            .map(|c| match c.kind {
                KeyKind::Asc => c.path.to_string(),
                KeyKind::Desc => format!("-{}", c.path),
                KeyKind::Hashed => format!("#{}", c.path),
                KeyKind::TwoD => format!("{}:2d", c.path),
                KeyKind::TwoDSphere => format!("{}:2dsphere", c.path),
                KeyKind::Text => format!("{}:text", c.path),
            })
            .collect::<Vec<_>>()
            .join(", ");

        if self.unique {
            write!(f, "UNIQUE {}({fields})", self.name)
        } else {
            write!(f, "{}({fields})", self.name)
        }
    }
}
