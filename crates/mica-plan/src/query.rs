//! Planner inputs: the canonicalized query and the planning options.

use crate::{field::FieldPath, index::IndexEntry, predicate::Predicate};
use serde::{Deserialize, Serialize};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

///
/// SortPattern
///
/// The requested output order: field paths with directions, significant in
/// sequence. Empty means no order was requested.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SortPattern(Vec<(FieldPath, OrderDirection)>);

impl SortPattern {
    #[must_use]
    pub fn new(fields: Vec<(FieldPath, OrderDirection)>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn asc(path: impl Into<FieldPath>) -> Self {
        Self(vec![(path.into(), OrderDirection::Asc)])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[(FieldPath, OrderDirection)] {
        &self.0
    }

    /// The same pattern with every direction flipped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(path, dir)| (path.clone(), dir.reversed()))
                .collect(),
        )
    }

    /// Whether an access path providing `self` satisfies a request for
    /// `wanted`: every requested field must match ours in sequence,
    /// including direction.
    #[must_use]
    pub fn provides(&self, wanted: &Self) -> bool {
        !wanted.is_empty()
            && wanted.0.len() <= self.0.len()
            && wanted.0.iter().zip(self.0.iter()).all(|(w, p)| w == p)
    }
}

///
/// ProjectionSpec
///
/// Which output fields the caller wants. `requires_document` is set when
/// the projection cannot be computed from individual fields (e.g. it keeps
/// the whole document minus exclusions).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectionSpec {
    pub fields: Vec<FieldPath>,
    pub requires_document: bool,
}

impl ProjectionSpec {
    #[must_use]
    pub fn fields(fields: Vec<FieldPath>) -> Self {
        Self {
            fields,
            requires_document: false,
        }
    }
}

///
/// CanonicalQuery
///
/// A normalized query: predicate tree plus declared sort, projection, and
/// pagination. `natural` requests collection order explicitly and is
/// mutually exclusive with `sort`.
///

#[derive(Clone, Debug)]
pub struct CanonicalQuery {
    pub filter: Predicate,
    pub sort: SortPattern,
    pub projection: Option<ProjectionSpec>,
    pub skip: u64,
    pub limit: Option<u64>,
    pub natural: Option<OrderDirection>,
}

impl CanonicalQuery {
    #[must_use]
    pub const fn new(filter: Predicate) -> Self {
        Self {
            filter,
            sort: SortPattern(Vec::new()),
            projection: None,
            skip: 0,
            limit: None,
            natural: None,
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortPattern) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionSpec) -> Self {
        self.projection = Some(projection);
        self
    }

    #[must_use]
    pub const fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_natural(mut self, direction: OrderDirection) -> Self {
        self.natural = Some(direction);
        self
    }
}

///
/// PlannerParams
///
/// The catalog snapshot and the planning options. Defaults allow table
/// scans, emit a collection-scan candidate only when nothing else exists,
/// and perform no shard filtering.
///

#[derive(Clone, Debug)]
pub struct PlannerParams {
    pub indices: Vec<IndexEntry>,
    /// When false, an index-free query fails with `NoViablePlan` instead of
    /// degrading to a collection scan.
    pub allow_table_scan: bool,
    /// Emit a collection-scan candidate even when indexed candidates exist.
    pub include_collection_scan: bool,
    /// Insert a shard-filter stage; requires `shard_key`.
    pub shard_filter: bool,
    pub shard_key: Option<Vec<FieldPath>>,
}

impl PlannerParams {
    #[must_use]
    pub fn new(indices: Vec<IndexEntry>) -> Self {
        Self {
            indices,
            allow_table_scan: true,
            include_collection_scan: false,
            shard_filter: false,
            shard_key: None,
        }
    }

    #[must_use]
    pub const fn no_table_scan(mut self) -> Self {
        self.allow_table_scan = false;
        self
    }

    #[must_use]
    pub fn with_shard_key(mut self, shard_key: Vec<FieldPath>) -> Self {
        self.shard_filter = true;
        self.shard_key = Some(shard_key);
        self
    }
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
