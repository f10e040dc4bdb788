mod invariants;
mod properties;

use crate::{
    index::{IndexEntry, KeyComponent},
    plan::{plan, solution::SolutionNode, QuerySolution},
    predicate::Predicate,
    query::{CanonicalQuery, PlannerParams},
};

fn asc_index(name: &str, fields: &[&str]) -> IndexEntry {
    IndexEntry::new(
        name,
        fields.iter().map(|field| KeyComponent::asc(*field)).collect(),
    )
}

fn plan_query(query: &CanonicalQuery, indices: Vec<IndexEntry>) -> Vec<QuerySolution> {
    plan(query, &PlannerParams::new(indices)).expect("planning should succeed")
}

fn plan_filter(filter: Predicate, indices: Vec<IndexEntry>) -> Vec<QuerySolution> {
    plan_query(&CanonicalQuery::new(filter), indices)
}

/// Every index scan in the tree, leaves first.
fn index_scans(node: &SolutionNode) -> Vec<&SolutionNode> {
    let mut out = Vec::new();
    collect_scans(node, &mut out);
    out
}

fn collect_scans<'a>(node: &'a SolutionNode, out: &mut Vec<&'a SolutionNode>) {
    match node {
        SolutionNode::IndexScan { .. } => out.push(node),
        SolutionNode::CollectionScan { .. } => {}
        SolutionNode::AndHash { children }
        | SolutionNode::AndSorted { children }
        | SolutionNode::Or { children } => {
            for child in children {
                collect_scans(child, out);
            }
        }
        SolutionNode::Fetch { child, .. }
        | SolutionNode::Sort { child, .. }
        | SolutionNode::ShardFilter { child, .. }
        | SolutionNode::Skip { child, .. }
        | SolutionNode::Limit { child, .. }
        | SolutionNode::Projection { child, .. } => collect_scans(child, out),
    }
}
