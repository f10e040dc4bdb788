//! Plan module wiring; must not implement planning or bounds logic.

pub(crate) mod analyze;
mod bounds;
pub(crate) mod builder;
mod explain;
pub(crate) mod planner;
pub(crate) mod rate;
mod solution;
#[cfg(test)]
mod tests;
pub(crate) mod tree;

///
/// Re-Exports
///
pub use bounds::{BoundsTightness, IndexBounds, Interval, OrderedIntervalList};
pub use explain::{ExplainPlan, ExplainStage};
pub use planner::plan;
pub use solution::{QuerySolution, SolutionNode};
