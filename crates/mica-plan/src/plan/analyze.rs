//! Plan finishing: the stages independent of how data was accessed.
//!
//! Takes a raw access path and layers on order, ownership filtering,
//! pagination, and output shaping. Sort is elided when the scan already
//! yields the requested order, possibly after flipping every scan in the
//! tree; covering analysis drops the fetch when index keys alone answer
//! the projection.

use crate::{
    plan::{
        bounds::{BoundsTightness, IndexBounds, OrderedIntervalList},
        solution::{QuerySolution, SolutionNode},
    },
    index::IndexEntry,
    query::{CanonicalQuery, OrderDirection, PlannerParams},
};

/// Wrap a raw access path into a finished solution for `query`.
pub(crate) fn analyze_data_access(
    query: &CanonicalQuery,
    params: &PlannerParams,
    access: SolutionNode,
) -> QuerySolution {
    let mut root = access;

    // Shard filtering sits beneath the terminal sort/projection stages so
    // disowned documents never reach them. The filter needs the shard key,
    // fetching first when the keys are not covered.
    if params.shard_filter {
        if let Some(shard_key) = &params.shard_key {
            if !shard_key.iter().all(|path| root.has_field(path)) {
                root = fetch(root);
            }
            root = SolutionNode::ShardFilter {
                shard_key: shard_key.clone(),
                child: Box::new(root),
            };
        }
    }

    if !query.sort.is_empty() {
        let provided = root.provided_sort();
        if provided.provides(&query.sort) {
            // Order already matches.
        } else if provided.reversed().provides(&query.sort) {
            root.reverse();
        } else {
            let covered = query
                .sort
                .fields()
                .iter()
                .all(|(path, _)| root.has_field(path));
            if !root.fetched() && !covered {
                root = fetch(root);
            }
            root = SolutionNode::Sort {
                pattern: query.sort.clone(),
                child: Box::new(root),
            };
        }
    }

    root = match &query.projection {
        Some(spec) => {
            let covered = !spec.requires_document
                && spec.fields.iter().all(|path| root.has_field(path));
            if !covered && !root.fetched() {
                root = fetch(root);
            }
            SolutionNode::Projection {
                spec: spec.clone(),
                child: Box::new(root),
            }
        }
        // Without a projection the caller receives whole documents.
        None if !root.fetched() => fetch(root),
        None => root,
    };

    if query.skip > 0 {
        root = SolutionNode::Skip {
            n: query.skip,
            child: Box::new(root),
        };
    }
    if let Some(limit) = query.limit {
        root = SolutionNode::Limit {
            n: limit,
            child: Box::new(root),
        };
    }

    QuerySolution::new(root)
}

/// The collection-scan fallback, honoring a requested natural direction
/// and carrying the whole filter.
#[must_use]
pub(crate) fn make_collection_scan(query: &CanonicalQuery) -> SolutionNode {
    SolutionNode::CollectionScan {
        direction: query.natural.unwrap_or(OrderDirection::Asc),
        filter: (!query.filter.is_trivial()).then(|| query.filter.clone()),
    }
}

/// A degenerate scan over the entire key range, useful when an index can
/// substitute for a collection scan purely to obtain its order.
#[must_use]
pub(crate) fn scan_whole_index(index: &IndexEntry, direction: OrderDirection) -> SolutionNode {
    let mut bounds = IndexBounds::new(
        index
            .key_pattern
            .iter()
            .map(|component| OrderedIntervalList::all_values(component.path.clone()))
            .collect(),
    );
    for (component, list) in index.key_pattern.iter().zip(&mut bounds.fields) {
        if component.kind.is_descending() {
            list.reverse();
        }
    }

    let mut scan = SolutionNode::IndexScan {
        index: index.clone(),
        bounds,
        direction: OrderDirection::Asc,
        tightness: BoundsTightness::Exact,
    };
    if direction == OrderDirection::Desc {
        scan.reverse();
    }
    scan
}

fn fetch(child: SolutionNode) -> SolutionNode {
    SolutionNode::Fetch {
        filter: None,
        child: Box::new(child),
    }
}
