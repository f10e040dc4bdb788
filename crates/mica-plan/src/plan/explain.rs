//! Deterministic, read-only explanation of query solutions; must not
//! execute or re-plan.

use crate::{
    plan::solution::{QuerySolution, SolutionNode},
    query::OrderDirection,
};
use serde::Serialize;

///
/// ExplainPlan
///
/// Stable, deterministic representation of a `QuerySolution` for
/// observability. Bounds render through their display form so two plans
/// with equal semantics explain identically.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExplainPlan {
    pub stage: ExplainStage,
    pub is_collection_scan: bool,
    pub has_sort_stage: bool,
    pub has_shard_filter: bool,
}

impl ExplainPlan {
    #[must_use]
    pub fn new(solution: &QuerySolution) -> Self {
        Self {
            stage: ExplainStage::new(&solution.root),
            is_collection_scan: solution.is_collection_scan,
            has_sort_stage: solution.has_sort_stage,
            has_shard_filter: solution.has_shard_filter,
        }
    }
}

///
/// ExplainStage
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ExplainStage {
    CollectionScan {
        direction: OrderDirection,
        filtered: bool,
    },
    IndexScan {
        index: String,
        bounds: Vec<String>,
        direction: OrderDirection,
        exact: bool,
    },
    Fetch {
        filtered: bool,
        child: Box<ExplainStage>,
    },
    AndHash {
        children: Vec<ExplainStage>,
    },
    AndSorted {
        children: Vec<ExplainStage>,
    },
    Or {
        children: Vec<ExplainStage>,
    },
    Sort {
        fields: Vec<(String, OrderDirection)>,
        child: Box<ExplainStage>,
    },
    ShardFilter {
        shard_key: Vec<String>,
        child: Box<ExplainStage>,
    },
    Projection {
        fields: Vec<String>,
        child: Box<ExplainStage>,
    },
    Skip {
        n: u64,
        child: Box<ExplainStage>,
    },
    Limit {
        n: u64,
        child: Box<ExplainStage>,
    },
}

impl ExplainStage {
    fn new(node: &SolutionNode) -> Self {
        match node {
            SolutionNode::CollectionScan { direction, filter } => Self::CollectionScan {
                direction: *direction,
                filtered: filter.is_some(),
            },
            SolutionNode::IndexScan {
                index,
                bounds,
                direction,
                tightness,
            } => Self::IndexScan {
                index: index.name.clone(),
                bounds: bounds.fields.iter().map(ToString::to_string).collect(),
                direction: *direction,
                exact: tightness.is_exact(),
            },
            SolutionNode::Fetch { filter, child } => Self::Fetch {
                filtered: filter.is_some(),
                child: Box::new(Self::new(child)),
            },
            SolutionNode::AndHash { children } => Self::AndHash {
                children: children.iter().map(Self::new).collect(),
            },
            SolutionNode::AndSorted { children } => Self::AndSorted {
                children: children.iter().map(Self::new).collect(),
            },
            SolutionNode::Or { children } => Self::Or {
                children: children.iter().map(Self::new).collect(),
            },
            SolutionNode::Sort { pattern, child } => Self::Sort {
                fields: pattern
                    .fields()
                    .iter()
                    .map(|(path, dir)| (path.to_string(), *dir))
                    .collect(),
                child: Box::new(Self::new(child)),
            },
            SolutionNode::ShardFilter { shard_key, child } => Self::ShardFilter {
                shard_key: shard_key.iter().map(ToString::to_string).collect(),
                child: Box::new(Self::new(child)),
            },
            SolutionNode::Projection { spec, child } => Self::Projection {
                fields: spec.fields.iter().map(ToString::to_string).collect(),
                child: Box::new(Self::new(child)),
            },
            SolutionNode::Skip { n, child } => Self::Skip {
                n: *n,
                child: Box::new(Self::new(child)),
            },
            SolutionNode::Limit { n, child } => Self::Limit {
                n: *n,
                child: Box::new(Self::new(child)),
            },
        }
    }
}
