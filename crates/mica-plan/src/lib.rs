//! Index-based access-path planning for MicaDB: rates a normalized
//! predicate tree against an index catalog snapshot and produces candidate
//! query solutions, exported ergonomically via the `prelude`.
//!
//! Planning is a synchronous pure computation. It performs no I/O, holds
//! no locks, and leaves the caller's query untouched; everything transient
//! lives and dies inside one `plan` call.

pub mod error;
pub mod field;
pub mod index;
pub mod plan;
pub mod predicate;
pub mod query;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, explain types, or planner internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        field::FieldPath,
        index::{IndexEntry, KeyComponent, KeyKind},
        predicate::{CompareOp, Predicate},
        query::{CanonicalQuery, OrderDirection, PlannerParams, ProjectionSpec, SortPattern},
        value::Value,
    };
}
