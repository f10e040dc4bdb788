//! Predicate trees as produced by the query canonicalizer.
//!
//! This layer is pure vocabulary: no index logic, no planning semantics.
//! The planner treats a predicate tree as working storage for the duration
//! of one planning call but never mutates the caller's copy.

use crate::{field::FieldPath, value::Value};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

///
/// ComparePredicate
///
/// One leaf comparison over a single field path. `In` carries its
/// alternatives as a `Value::List`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub path: FieldPath,
    pub op: CompareOp,
    pub value: Value,
}

///
/// TextPredicate
///
/// Full-text search operator. Answerable only through a text index; there
/// is no per-document fallback evaluation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextPredicate {
    pub query: String,
    pub language: String,
}

///
/// GeoSystem
///
/// Which geometry system a geo predicate targets. Flat predicates are
/// answerable by 2d indexes, spherical ones by 2dsphere indexes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeoSystem {
    Flat,
    Spherical,
}

///
/// GeoPredicate
///
/// Geometric containment/intersection over one field path. The shape is an
/// opaque value; the planner only rates index compatibility and leaves the
/// actual geometric match to the residual filter.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeoPredicate {
    pub path: FieldPath,
    pub system: GeoSystem,
    pub shape: Value,
}

///
/// Predicate
///
/// A normalized boolean expression tree. Children are exclusively owned by
/// their parent. `ElemMatch` and `All` carry paths relative to which their
/// subtrees are interpreted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Marks a subtree that must be evaluated as one unit against a fetched
    /// document. Never answerable from index bounds.
    Atomic(Box<Predicate>),
    /// `{path: {$elemMatch: {...}}}`: the inner tree matches one array
    /// element, with its paths relative to `path`.
    ElemMatch {
        path: FieldPath,
        inner: Box<Predicate>,
    },
    /// `{path: {$all: [...]}}` with expression operands.
    All {
        path: FieldPath,
        children: Vec<Predicate>,
    },
    Compare(ComparePredicate),
    Text(TextPredicate),
    Geo(GeoPredicate),
}

impl Predicate {
    #[must_use]
    pub fn compare(path: impl Into<FieldPath>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate {
            path: path.into(),
            op,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn eq(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn in_list(path: impl Into<FieldPath>, values: Vec<Value>) -> Self {
        Self::compare(path, CompareOp::In, Value::List(values))
    }

    #[must_use]
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text(TextPredicate {
            query: query.into(),
            language: String::new(),
        })
    }

    #[must_use]
    pub fn geo(path: impl Into<FieldPath>, system: GeoSystem, shape: impl Into<Value>) -> Self {
        Self::Geo(GeoPredicate {
            path: path.into(),
            system,
            shape: shape.into(),
        })
    }

    #[must_use]
    pub fn and(children: Vec<Predicate>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub fn or(children: Vec<Predicate>) -> Self {
        Self::Or(children)
    }

    #[must_use]
    pub fn negate(inner: Predicate) -> Self {
        Self::Not(Box::new(inner))
    }

    #[must_use]
    pub fn elem_match(path: impl Into<FieldPath>, inner: Predicate) -> Self {
        Self::ElemMatch {
            path: path.into(),
            inner: Box::new(inner),
        }
    }

    #[must_use]
    pub fn all(path: impl Into<FieldPath>, children: Vec<Predicate>) -> Self {
        Self::All {
            path: path.into(),
            children,
        }
    }

    /// The canonical match-everything predicate, `{}`.
    #[must_use]
    pub const fn always() -> Self {
        Self::And(Vec::new())
    }

    /// Whether this predicate matches every document.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    /// Whether any node in the tree satisfies `test`.
    pub fn has_node(&self, test: &impl Fn(&Self) -> bool) -> bool {
        if test(self) {
            return true;
        }

        match self {
            Self::And(children) | Self::Or(children) | Self::All { children, .. } => {
                children.iter().any(|child| child.has_node(test))
            }
            Self::Not(inner) | Self::Atomic(inner) | Self::ElemMatch { inner, .. } => {
                inner.has_node(test)
            }
            Self::Compare(_) | Self::Text(_) | Self::Geo(_) => false,
        }
    }
}
