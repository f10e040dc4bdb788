//! Caller-visible planning failures.
//!
//! Internal contract violations (restricted-mode mutation, compound-bound
//! gaps, dropped leaves) are debug assertions, not error variants: they
//! indicate a planner defect, not bad input.

use thiserror::Error as ThisError;

///
/// PlanError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    /// No index is usable and table scans are disallowed.
    #[error("no viable plan: no usable index and table scans are disallowed")]
    NoViablePlan,

    /// A text-search predicate cannot be answered without a text index,
    /// not even by a collection scan.
    #[error("text search requires a text index on the collection")]
    TextWithoutTextIndex,
}
