//! Intervals and per-component index bounds.
//!
//! An ordered interval list must be sorted ascending in storage order and
//! non-overlapping before it is attached to a scan node; `union` and
//! `intersect` maintain that form. Lists are built in ascending value
//! order regardless of key direction; the scan builder reverses individual
//! lists at finish time so each matches storage order times scan direction.

use crate::{
    field::FieldPath,
    index::{KeyComponent, KeyKind},
    plan::tree::NodeKind,
    predicate::{CompareOp, ComparePredicate},
    value::Value,
};
use serde::Serialize;
use std::fmt::{self, Display};

///
/// BoundsTightness
///
/// Whether an interval set matches the source predicate precisely or only
/// a superset. Inexact bounds force a fetch-and-recheck stage above the
/// scan.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum BoundsTightness {
    Exact,
    Inexact,
}

impl BoundsTightness {
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Exact, Self::Exact) => Self::Exact,
            _ => Self::Inexact,
        }
    }

    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact)
    }
}

///
/// Interval
///
/// One `[low, high]` value range with per-bound inclusivity. Construction
/// keeps `low <= high`; an interval that excludes everything is never
/// built.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Interval {
    pub low: Value,
    pub high: Value,
    pub low_inclusive: bool,
    pub high_inclusive: bool,
}

impl Interval {
    #[must_use]
    pub fn new(low: Value, high: Value, low_inclusive: bool, high_inclusive: bool) -> Self {
        debug_assert!(low <= high, "interval bounds out of order");

        Self {
            low,
            high,
            low_inclusive,
            high_inclusive,
        }
    }

    #[must_use]
    pub fn point(value: Value) -> Self {
        Self::new(value.clone(), value, true, true)
    }

    /// The unrestricted interval covering every storable value.
    #[must_use]
    pub fn all_values() -> Self {
        Self::new(Value::MinKey, Value::MaxKey, true, true)
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        self.low_inclusive && self.high_inclusive && self.low == self.high
    }

    #[must_use]
    pub fn is_all_values(&self) -> bool {
        self.low_inclusive
            && self.high_inclusive
            && self.low == Value::MinKey
            && self.high == Value::MaxKey
    }

    /// The same range described for a scan running in the opposite
    /// direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            low: self.high.clone(),
            high: self.low.clone(),
            low_inclusive: self.high_inclusive,
            high_inclusive: self.low_inclusive,
        }
    }

    // True when `self` ends strictly before `other` starts with no shared
    // point and no adjacency that a union could fuse.
    fn strictly_before(&self, other: &Self) -> bool {
        self.high < other.low
            || (self.high == other.low && !self.high_inclusive && !other.low_inclusive)
    }

    fn intersect(&self, other: &Self) -> Option<Self> {
        let (low, low_inclusive) = match self.low.cmp(&other.low) {
            std::cmp::Ordering::Less => (other.low.clone(), other.low_inclusive),
            std::cmp::Ordering::Greater => (self.low.clone(), self.low_inclusive),
            std::cmp::Ordering::Equal => {
                (self.low.clone(), self.low_inclusive && other.low_inclusive)
            }
        };
        let (high, high_inclusive) = match self.high.cmp(&other.high) {
            std::cmp::Ordering::Less => (self.high.clone(), self.high_inclusive),
            std::cmp::Ordering::Greater => (other.high.clone(), other.high_inclusive),
            std::cmp::Ordering::Equal => (
                self.high.clone(),
                self.high_inclusive && other.high_inclusive,
            ),
        };

        if low > high || (low == high && !(low_inclusive && high_inclusive)) {
            return None;
        }

        Some(Self {
            low,
            high,
            low_inclusive,
            high_inclusive,
        })
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.low_inclusive { '[' } else { '(' };
        let close = if self.high_inclusive { ']' } else { ')' };
        write!(f, "{open}{:?}, {:?}{close}", self.low, self.high)
    }
}

///
/// OrderedIntervalList
///
/// The bounds for one key component: sorted, non-overlapping intervals in
/// ascending storage order.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OrderedIntervalList {
    pub path: FieldPath,
    pub intervals: Vec<Interval>,
}

impl OrderedIntervalList {
    #[must_use]
    pub fn new(path: FieldPath, intervals: Vec<Interval>) -> Self {
        let list = Self { path, intervals };
        debug_assert!(list.is_well_formed(), "interval list not normalized");
        list
    }

    #[must_use]
    pub fn all_values(path: FieldPath) -> Self {
        Self {
            path,
            intervals: vec![Interval::all_values()],
        }
    }

    #[must_use]
    pub fn is_all_values(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].is_all_values()
    }

    /// Sorted ascending with no overlap between neighbors. Holds for every
    /// list in ascending form; a reversed list (descending scan) is the
    /// mirror image and deliberately not checked here.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.intervals
            .windows(2)
            .all(|pair| pair[0].strictly_before(&pair[1]))
    }

    /// Merge with another list over the same component, keeping entries in
    /// either (OR of the two predicates). Overlapping and touching
    /// intervals fuse.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        debug_assert_eq!(self.path, other.path, "union across key components");

        let mut merged: Vec<Interval> = self
            .intervals
            .iter()
            .chain(other.intervals.iter())
            .cloned()
            .collect();
        merged.sort_by(|a, b| {
            a.low
                .cmp(&b.low)
                .then_with(|| b.low_inclusive.cmp(&a.low_inclusive))
        });

        let mut out: Vec<Interval> = Vec::with_capacity(merged.len());
        for interval in merged {
            match out.last_mut() {
                Some(last) if !last.strictly_before(&interval) => {
                    let extends = interval.high > last.high
                        || (interval.high == last.high
                            && interval.high_inclusive
                            && !last.high_inclusive);
                    if extends {
                        last.high = interval.high;
                        last.high_inclusive = interval.high_inclusive;
                    }
                }
                _ => out.push(interval),
            }
        }

        Self {
            path: self.path.clone(),
            intervals: out,
        }
    }

    /// Narrow to entries in both lists (AND of the two predicates).
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        debug_assert_eq!(self.path, other.path, "intersect across key components");

        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                if let Some(common) = a.intersect(b) {
                    out.push(common);
                }
            }
        }

        Self {
            path: self.path.clone(),
            intervals: out,
        }
    }

    /// Flip to the opposite scan direction: list order and every interval
    /// reverse together.
    pub fn reverse(&mut self) {
        self.intervals.reverse();
        for interval in &mut self.intervals {
            *interval = interval.reversed();
        }
    }
}

impl Display for OrderedIntervalList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path)?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(" ∪ ")?;
            }
            interval.fmt(f)?;
        }
        Ok(())
    }
}

///
/// IndexBounds
///
/// One interval list per key component, in key-pattern order. A compound
/// scan carries exactly as many lists as the index has components;
/// unconstrained trailing components hold the all-values interval.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IndexBounds {
    pub fields: Vec<OrderedIntervalList>,
}

impl IndexBounds {
    #[must_use]
    pub fn new(fields: Vec<OrderedIntervalList>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Flip every component list to the opposite scan direction.
    pub fn reverse(&mut self) {
        for list in &mut self.fields {
            list.reverse();
        }
    }
}

/// Compute the interval list and tightness for one leaf predicate against
/// one key component. The caller has already checked compatibility; an
/// incompatible pairing here is a planner defect.
#[must_use]
pub(crate) fn translate(kind: &NodeKind, component: &KeyComponent) -> (OrderedIntervalList, BoundsTightness) {
    let path = component.path.clone();

    match kind {
        NodeKind::Compare(cmp) if component.kind == KeyKind::Hashed => {
            translate_hashed(cmp, path)
        }
        NodeKind::Compare(cmp) => translate_compare(cmp, path),
        // No geometry engine and no term extraction here: geo and text
        // scans cover the whole component and re-check on fetch.
        NodeKind::Text(_) | NodeKind::Geo(_) => (
            OrderedIntervalList::all_values(path),
            BoundsTightness::Inexact,
        ),
        _ => {
            debug_assert!(false, "bounds requested for non-leaf node");
            (
                OrderedIntervalList::all_values(path),
                BoundsTightness::Inexact,
            )
        }
    }
}

fn translate_compare(
    cmp: &ComparePredicate,
    path: FieldPath,
) -> (OrderedIntervalList, BoundsTightness) {
    let value = &cmp.value;

    match cmp.op {
        CompareOp::Eq => {
            // Equality to null also matches missing fields; equality to a
            // list matches on element traversal. Both need a recheck.
            let tightness = if value.is_null() || matches!(value, Value::List(_)) {
                BoundsTightness::Inexact
            } else {
                BoundsTightness::Exact
            };

            (
                OrderedIntervalList::new(path, vec![Interval::point(value.clone())]),
                tightness,
            )
        }
        CompareOp::In => {
            let Value::List(alternatives) = value else {
                debug_assert!(false, "$in carries a non-list value");
                return (
                    OrderedIntervalList::all_values(path),
                    BoundsTightness::Inexact,
                );
            };

            let mut tightness = BoundsTightness::Exact;
            let mut list = OrderedIntervalList::new(path.clone(), Vec::new());
            for alternative in alternatives {
                if alternative.is_null() || matches!(alternative, Value::List(_)) {
                    tightness = BoundsTightness::Inexact;
                }
                let point = OrderedIntervalList::new(
                    path.clone(),
                    vec![Interval::point(alternative.clone())],
                );
                list = list.union(&point);
            }

            (list, tightness)
        }
        CompareOp::Lt => (
            OrderedIntervalList::new(
                path,
                vec![Interval::new(Value::MinKey, value.clone(), true, false)],
            ),
            BoundsTightness::Exact,
        ),
        CompareOp::Lte => (
            OrderedIntervalList::new(
                path,
                vec![Interval::new(Value::MinKey, value.clone(), true, true)],
            ),
            BoundsTightness::Exact,
        ),
        CompareOp::Gt => (
            OrderedIntervalList::new(
                path,
                vec![Interval::new(value.clone(), Value::MaxKey, false, true)],
            ),
            BoundsTightness::Exact,
        ),
        CompareOp::Gte => (
            OrderedIntervalList::new(
                path,
                vec![Interval::new(value.clone(), Value::MaxKey, true, true)],
            ),
            BoundsTightness::Exact,
        ),
        CompareOp::Ne => {
            // Everything but the point: the complement pair. Inexact
            // because array traversal can still produce false positives.
            let below = Interval::new(Value::MinKey, value.clone(), true, false);
            let above = Interval::new(value.clone(), Value::MaxKey, false, true);
            (
                OrderedIntervalList::new(path, vec![below, above]),
                BoundsTightness::Inexact,
            )
        }
    }
}

// Hashed components store xxh3 of the value, so only point lookups on the
// stored hash are expressible. Rating guarantees the op is Eq or In.
fn translate_hashed(
    cmp: &ComparePredicate,
    path: FieldPath,
) -> (OrderedIntervalList, BoundsTightness) {
    match cmp.op {
        CompareOp::Eq => (
            OrderedIntervalList::new(path, vec![Interval::point(cmp.value.hashed())]),
            BoundsTightness::Exact,
        ),
        CompareOp::In => {
            let Value::List(alternatives) = &cmp.value else {
                debug_assert!(false, "$in carries a non-list value");
                return (
                    OrderedIntervalList::all_values(path),
                    BoundsTightness::Inexact,
                );
            };

            let mut list = OrderedIntervalList::new(path.clone(), Vec::new());
            for alternative in alternatives {
                let point = OrderedIntervalList::new(
                    path.clone(),
                    vec![Interval::point(alternative.hashed())],
                );
                list = list.union(&point);
            }

            (list, BoundsTightness::Exact)
        }
        _ => {
            debug_assert!(false, "range predicate on a hashed component");
            (
                OrderedIntervalList::all_values(path),
                BoundsTightness::Inexact,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    fn leaf(pred: &Predicate) -> NodeKind {
        match pred {
            Predicate::Compare(cmp) => NodeKind::Compare(cmp.clone()),
            Predicate::Text(text) => NodeKind::Text(text.clone()),
            Predicate::Geo(geo) => NodeKind::Geo(geo.clone()),
            _ => panic!("not a leaf"),
        }
    }

    #[test]
    fn equality_is_an_exact_point() {
        let (list, tightness) = translate(&leaf(&Predicate::eq("a", 5)), &KeyComponent::asc("a"));
        assert_eq!(list.intervals, vec![Interval::point(Value::Int(5))]);
        assert!(tightness.is_exact());
    }

    #[test]
    fn null_equality_is_inexact() {
        let (_, tightness) = translate(
            &leaf(&Predicate::eq("a", Value::Null)),
            &KeyComponent::asc("a"),
        );
        assert_eq!(tightness, BoundsTightness::Inexact);
    }

    #[test]
    fn range_is_half_open_toward_the_key_extreme() {
        let (list, tightness) = translate(&leaf(&Predicate::gt("a", 2)), &KeyComponent::asc("a"));
        assert_eq!(
            list.intervals,
            vec![Interval::new(Value::Int(2), Value::MaxKey, false, true)],
        );
        assert!(tightness.is_exact());

        let (list, _) = translate(&leaf(&Predicate::lte("a", 8)), &KeyComponent::asc("a"));
        assert_eq!(
            list.intervals,
            vec![Interval::new(Value::MinKey, Value::Int(8), true, true)],
        );
    }

    #[test]
    fn in_list_unions_sorted_points() {
        let values = vec![Value::Int(7), Value::Int(3), Value::Int(7)];
        let (list, tightness) = translate(
            &leaf(&Predicate::in_list("a", values)),
            &KeyComponent::asc("a"),
        );
        assert_eq!(
            list.intervals,
            vec![Interval::point(Value::Int(3)), Interval::point(Value::Int(7))],
        );
        assert!(tightness.is_exact());
    }

    #[test]
    fn ne_is_the_inexact_complement_pair() {
        let (list, tightness) = translate(&leaf(&Predicate::ne("a", 4)), &KeyComponent::asc("a"));
        assert_eq!(list.intervals.len(), 2);
        assert_eq!(tightness, BoundsTightness::Inexact);
        assert!(list.is_well_formed());
    }

    #[test]
    fn hashed_equality_points_at_the_stored_hash() {
        let component = KeyComponent::new("a", KeyKind::Hashed);
        let (list, tightness) = translate(&leaf(&Predicate::eq("a", 5)), &component);
        assert_eq!(
            list.intervals,
            vec![Interval::point(Value::Int(5).hashed())],
        );
        assert!(tightness.is_exact());
    }

    #[test]
    fn intersection_narrows_overlap() {
        let path = FieldPath::new("a");
        let low = OrderedIntervalList::new(
            path.clone(),
            vec![Interval::new(Value::Int(0), Value::Int(10), true, true)],
        );
        let high = OrderedIntervalList::new(
            path.clone(),
            vec![Interval::new(Value::Int(5), Value::Int(20), false, true)],
        );
        assert_eq!(
            low.intersect(&high).intervals,
            vec![Interval::new(Value::Int(5), Value::Int(10), false, true)],
        );
    }

    #[test]
    fn union_fuses_touching_intervals() {
        let path = FieldPath::new("a");
        let left = OrderedIntervalList::new(
            path.clone(),
            vec![Interval::new(Value::Int(0), Value::Int(5), true, true)],
        );
        let right = OrderedIntervalList::new(
            path.clone(),
            vec![Interval::new(Value::Int(5), Value::Int(9), false, true)],
        );
        assert_eq!(
            left.union(&right).intervals,
            vec![Interval::new(Value::Int(0), Value::Int(9), true, true)],
        );
    }

    #[test]
    fn reverse_is_an_involution() {
        let (mut list, _) = translate(&leaf(&Predicate::ne("a", 4)), &KeyComponent::asc("a"));
        let original = list.clone();
        list.reverse();
        assert_ne!(list, original);
        list.reverse();
        assert_eq!(list, original);
    }
}
