//! Property tests over interval algebra and scan reversal.

use super::asc_index;
use crate::{
    plan::{BoundsTightness, IndexBounds, Interval, OrderedIntervalList, SolutionNode},
    query::OrderDirection,
    value::Value,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Sorted distinct integers pair up into disjoint intervals, yielding an
// arbitrary well-formed list.
fn oil_strategy() -> impl Strategy<Value = OrderedIntervalList> {
    prop::collection::btree_set(-100i64..100, 1..8).prop_map(|points| {
        let points: Vec<i64> = points.into_iter().collect();
        let intervals = points
            .chunks(2)
            .map(|pair| match *pair {
                [low, high] => Interval::new(Value::Int(low), Value::Int(high), true, false),
                [point] => Interval::point(Value::Int(point)),
                _ => unreachable!(),
            })
            .collect();
        OrderedIntervalList::new("a".into(), intervals)
    })
}

fn scan(bounds: IndexBounds) -> SolutionNode {
    SolutionNode::IndexScan {
        index: asc_index("a_1", &["a"]),
        bounds,
        direction: OrderDirection::Asc,
        tightness: BoundsTightness::Exact,
    }
}

proptest! {
    #[test]
    fn union_stays_well_formed(a in oil_strategy(), b in oil_strategy()) {
        prop_assert!(a.union(&b).is_well_formed());
    }

    #[test]
    fn intersect_stays_well_formed(a in oil_strategy(), b in oil_strategy()) {
        prop_assert!(a.intersect(&b).is_well_formed());
    }

    #[test]
    fn union_is_commutative(a in oil_strategy(), b in oil_strategy()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn intersect_never_widens(a in oil_strategy(), b in oil_strategy()) {
        let narrowed = a.intersect(&b);
        let total: BTreeSet<(Value, Value)> = a
            .intervals
            .iter()
            .map(|i| (i.low.clone(), i.high.clone()))
            .collect();
        for interval in &narrowed.intervals {
            prop_assert!(total.iter().any(|(low, high)| *low <= interval.low && interval.high <= *high));
        }
    }

    #[test]
    fn reverse_scans_is_an_involution(list in oil_strategy()) {
        let mut node = SolutionNode::Fetch {
            filter: None,
            child: Box::new(scan(IndexBounds::new(vec![list]))),
        };
        let original = node.clone();
        node.reverse();
        node.reverse();
        prop_assert_eq!(node, original);
    }
}
