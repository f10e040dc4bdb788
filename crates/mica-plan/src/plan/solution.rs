//! Access-path trees and finished query solutions.
//!
//! Ownership is strictly tree shaped. A discarded candidate drops its
//! whole subtree; nothing is shared between solutions.

use crate::{
    field::FieldPath,
    index::IndexEntry,
    plan::bounds::{BoundsTightness, IndexBounds},
    predicate::Predicate,
    query::{OrderDirection, ProjectionSpec, SortPattern},
};

///
/// SolutionNode
///
/// One execution stage. Scans are the leaves; everything else wraps
/// children it exclusively owns.
///

#[derive(Clone, Debug, PartialEq)]
pub enum SolutionNode {
    CollectionScan {
        direction: OrderDirection,
        filter: Option<Predicate>,
    },
    IndexScan {
        index: IndexEntry,
        bounds: IndexBounds,
        direction: OrderDirection,
        tightness: BoundsTightness,
    },
    Fetch {
        filter: Option<Predicate>,
        child: Box<SolutionNode>,
    },
    AndHash {
        children: Vec<SolutionNode>,
    },
    AndSorted {
        children: Vec<SolutionNode>,
    },
    Or {
        children: Vec<SolutionNode>,
    },
    Sort {
        pattern: SortPattern,
        child: Box<SolutionNode>,
    },
    ShardFilter {
        shard_key: Vec<FieldPath>,
        child: Box<SolutionNode>,
    },
    Projection {
        spec: ProjectionSpec,
        child: Box<SolutionNode>,
    },
    Skip {
        n: u64,
        child: Box<SolutionNode>,
    },
    Limit {
        n: u64,
        child: Box<SolutionNode>,
    },
}

impl SolutionNode {
    /// Whether this stage outputs whole documents rather than index key
    /// projections.
    #[must_use]
    pub fn fetched(&self) -> bool {
        match self {
            Self::CollectionScan { .. } | Self::Fetch { .. } => true,
            Self::IndexScan { .. } => false,
            Self::AndHash { children } | Self::AndSorted { children } => {
                children.iter().any(SolutionNode::fetched)
            }
            Self::Or { children } => children.iter().all(SolutionNode::fetched),
            Self::Sort { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. }
            | Self::Projection { child, .. } => child.fetched(),
        }
    }

    /// Whether the named field is available in this stage's output without
    /// fetching. Multikey index keys hold per-element values, so they never
    /// reconstruct a field.
    #[must_use]
    pub fn has_field(&self, path: &FieldPath) -> bool {
        match self {
            Self::CollectionScan { .. } | Self::Fetch { .. } => true,
            Self::IndexScan { index, .. } => {
                !index.multikey
                    && index
                        .key_pattern
                        .iter()
                        .any(|c| c.kind.is_ordinary() && c.path == *path)
            }
            Self::AndHash { children } | Self::AndSorted { children } => {
                children.iter().any(|child| child.has_field(path))
            }
            Self::Or { children } => children.iter().all(|child| child.has_field(path)),
            Self::Projection { spec, .. } => spec.fields.contains(path),
            Self::Sort { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. } => child.has_field(path),
        }
    }

    /// Whether output streams in record-id order, the precondition for
    /// sorted intersection. An index scan does when every component is
    /// pinned to a single point.
    #[must_use]
    pub fn sorted_by_record_id(&self) -> bool {
        match self {
            Self::IndexScan { bounds, .. } => bounds
                .fields
                .iter()
                .all(|list| list.intervals.len() == 1 && list.intervals[0].is_point()),
            Self::Fetch { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. } => child.sorted_by_record_id(),
            Self::AndSorted { .. } => true,
            _ => false,
        }
    }

    /// The sort order this stage's output is known to follow, empty when
    /// none is guaranteed.
    #[must_use]
    pub fn provided_sort(&self) -> SortPattern {
        match self {
            Self::IndexScan {
                index, direction, ..
            } => index_provided_sort(index, *direction),
            Self::Sort { pattern, .. } => pattern.clone(),
            Self::Fetch { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. }
            | Self::Projection { child, .. } => child.provided_sort(),
            _ => SortPattern::default(),
        }
    }

    /// Flip every index scan in the tree to the opposite direction, bounds
    /// included. Applying this twice restores the original tree.
    pub fn reverse(&mut self) {
        match self {
            Self::IndexScan {
                bounds, direction, ..
            } => {
                *direction = direction.reversed();
                bounds.reverse();
            }
            Self::CollectionScan { .. } => {}
            Self::AndHash { children } | Self::AndSorted { children } | Self::Or { children } => {
                for child in children {
                    child.reverse();
                }
            }
            Self::Fetch { child, .. }
            | Self::Sort { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. }
            | Self::Projection { child, .. } => child.reverse(),
        }
    }

    /// Whether any stage in the tree satisfies `test`.
    pub fn has_stage(&self, test: &impl Fn(&Self) -> bool) -> bool {
        if test(self) {
            return true;
        }

        match self {
            Self::CollectionScan { .. } | Self::IndexScan { .. } => false,
            Self::AndHash { children } | Self::AndSorted { children } | Self::Or { children } => {
                children.iter().any(|child| child.has_stage(test))
            }
            Self::Fetch { child, .. }
            | Self::Sort { child, .. }
            | Self::ShardFilter { child, .. }
            | Self::Skip { child, .. }
            | Self::Limit { child, .. }
            | Self::Projection { child, .. } => child.has_stage(test),
        }
    }
}

/// The order an index scan emits keys in: ordinary leading components with
/// each component's direction composed with the scan direction. Truncated
/// at the first special component, which preserves no order.
#[must_use]
pub(crate) fn index_provided_sort(index: &IndexEntry, direction: OrderDirection) -> SortPattern {
    let fields = index
        .key_pattern
        .iter()
        .take_while(|c| c.kind.is_ordinary())
        .map(|c| {
            let component_dir = if c.kind.is_descending() {
                OrderDirection::Desc
            } else {
                OrderDirection::Asc
            };
            let dir = match direction {
                OrderDirection::Asc => component_dir,
                OrderDirection::Desc => component_dir.reversed(),
            };
            (c.path.clone(), dir)
        })
        .collect();

    SortPattern::new(fields)
}

///
/// QuerySolution
///
/// One finished candidate plan plus the metadata a downstream ranker
/// inspects without walking the tree.
///

#[derive(Clone, Debug, PartialEq)]
pub struct QuerySolution {
    pub root: SolutionNode,
    pub is_collection_scan: bool,
    pub has_sort_stage: bool,
    pub has_shard_filter: bool,
}

impl QuerySolution {
    #[must_use]
    pub fn new(root: SolutionNode) -> Self {
        let is_collection_scan = matches!(root_scan(&root), Some(SolutionNode::CollectionScan { .. }));
        let has_sort_stage = root.has_stage(&|node| matches!(node, SolutionNode::Sort { .. }));
        let has_shard_filter =
            root.has_stage(&|node| matches!(node, SolutionNode::ShardFilter { .. }));

        Self {
            root,
            is_collection_scan,
            has_sort_stage,
            has_shard_filter,
        }
    }
}

// The single scan at the bottom of a pass-through chain, if the plan has
// exactly one.
fn root_scan(node: &SolutionNode) -> Option<&SolutionNode> {
    match node {
        SolutionNode::CollectionScan { .. } | SolutionNode::IndexScan { .. } => Some(node),
        SolutionNode::Fetch { child, .. }
        | SolutionNode::Sort { child, .. }
        | SolutionNode::ShardFilter { child, .. }
        | SolutionNode::Skip { child, .. }
        | SolutionNode::Limit { child, .. }
        | SolutionNode::Projection { child, .. } => root_scan(child),
        SolutionNode::AndHash { .. } | SolutionNode::AndSorted { .. } | SolutionNode::Or { .. } => {
            None
        }
    }
}
