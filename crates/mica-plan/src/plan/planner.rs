//! Top-level planning entry point; must not execute plans or touch storage.

use crate::{
    error::PlanError,
    plan::{
        analyze::{analyze_data_access, make_collection_scan, scan_whole_index},
        builder::{assign_tags, build_indexed_data_access, BuildMode},
        rate::{collect_fields, find_relevant_indices, rate_indices},
        solution::{index_provided_sort, QuerySolution, SolutionNode},
        tree::WorkingTree,
    },
    index::KeyKind,
    predicate::Predicate,
    query::{CanonicalQuery, OrderDirection, PlannerParams},
};
use std::collections::BTreeSet;
use tracing::debug;

/// Produce every candidate solution for `query` against the catalog
/// snapshot in `params`. Candidates are returned in deterministic order:
/// the indexed plan, then a whole-index scan offered purely for sort
/// order, then the collection-scan fallback. Ranking among them is a
/// downstream concern.
pub fn plan(
    query: &CanonicalQuery,
    params: &PlannerParams,
) -> Result<Vec<QuerySolution>, PlanError> {
    // An explicit natural-order request bypasses index selection entirely.
    if query.natural.is_some() {
        if !params.allow_table_scan {
            return Err(PlanError::NoViablePlan);
        }
        let scan = make_collection_scan(query);
        return Ok(vec![analyze_data_access(query, params, scan)]);
    }

    let has_text = query
        .filter
        .has_node(&|node| matches!(node, Predicate::Text(_)));

    let probe = WorkingTree::from_predicate(&query.filter);
    let mut fields = BTreeSet::new();
    collect_fields(&probe, probe.root(), "", &mut fields);

    let relevant = find_relevant_indices(&fields, has_text, &params.indices);
    debug!(
        fields = fields.len(),
        relevant = relevant.len(),
        "filtered index catalog"
    );

    if has_text
        && !relevant.iter().any(|index| {
            index
                .key_pattern
                .iter()
                .any(|component| component.kind == KeyKind::Text)
        })
    {
        return Err(PlanError::TextWithoutTextIndex);
    }

    let mut solutions = Vec::new();

    if !relevant.is_empty() && !query.filter.is_trivial() {
        let mut tree = WorkingTree::from_predicate(&query.filter);
        let rate = rate_indices(&tree, &relevant);
        let tags = assign_tags(&mut tree, &rate, &relevant);
        let root = tree.root();
        if let Some(access) =
            build_indexed_data_access(&mut tree, &tags, &relevant, root, BuildMode::Unrestricted)
        {
            debug!("built indexed candidate");
            solutions.push(analyze_data_access(query, params, access));
        }
    }

    // When nothing above yields the requested order, an index can still be
    // worth scanning whole purely to avoid a sort stage. Text queries are
    // excluded: a non-text scan leaves the text predicate to the fetch
    // filter, which cannot evaluate it.
    if !has_text && !query.sort.is_empty() && solutions.iter().all(|s| s.has_sort_stage) {
        if let Some((index, direction)) = params
            .indices
            .iter()
            .filter(|index| !index.has_special_component())
            .find_map(|index| {
                let provided = index_provided_sort(index, OrderDirection::Asc);
                if provided.provides(&query.sort) {
                    Some((index, OrderDirection::Asc))
                } else if provided.reversed().provides(&query.sort) {
                    Some((index, OrderDirection::Desc))
                } else {
                    None
                }
            })
        {
            debug!(index = %index, "offering whole-index scan for order");
            let scan = scan_whole_index(index, direction);
            let access = if query.filter.is_trivial() {
                scan
            } else {
                SolutionNode::Fetch {
                    filter: Some(query.filter.clone()),
                    child: Box::new(scan),
                }
            };
            solutions.push(analyze_data_access(query, params, access));
        }
    }

    if has_text {
        // Text matching has no per-document fallback, so a collection scan
        // can never stand in.
        if solutions.is_empty() {
            return Err(PlanError::NoViablePlan);
        }
        return Ok(solutions);
    }

    if params.allow_table_scan && (params.include_collection_scan || solutions.is_empty()) {
        debug!("adding collection-scan candidate");
        let scan = make_collection_scan(query);
        solutions.push(analyze_data_access(query, params, scan));
    }

    if solutions.is_empty() {
        return Err(PlanError::NoViablePlan);
    }

    Ok(solutions)
}
