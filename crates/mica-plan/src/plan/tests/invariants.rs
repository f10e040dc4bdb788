//! Structural invariants every produced solution must uphold.

use super::{asc_index, index_scans, plan_filter, plan_query};
use crate::{
    plan::SolutionNode,
    predicate::Predicate,
    query::{CanonicalQuery, SortPattern},
    value::Value,
};

#[test]
fn compound_bounds_carry_one_list_per_key_component() {
    // `c` sits after the unconstrained `b`, so it cannot narrow the scan.
    let pred = Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("c", 2)]);
    let solutions = plan_filter(pred, vec![asc_index("a_b_c", &["a", "b", "c"])]);

    let scans = index_scans(&solutions[0].root);
    assert_eq!(scans.len(), 1);

    let SolutionNode::IndexScan { bounds, .. } = scans[0] else {
        unreachable!();
    };
    assert_eq!(bounds.num_fields(), 3);
    assert!(!bounds.fields[0].is_all_values());
    assert!(bounds.fields[1].is_all_values());
    assert!(bounds.fields[2].is_all_values());

    // The unusable `c` predicate survives as the residual filter.
    let SolutionNode::Fetch { filter, .. } = &solutions[0].root else {
        panic!("expected a filtering fetch");
    };
    assert_eq!(filter, &Some(Predicate::eq("c", 2)));
}

#[test]
fn restrictive_bounds_always_form_a_leading_prefix() {
    let cases = vec![
        Predicate::and(vec![Predicate::eq("a", 1), Predicate::lt("b", 9)]),
        Predicate::and(vec![Predicate::gt("b", 0), Predicate::eq("c", 2)]),
        Predicate::or(vec![Predicate::eq("a", 1), Predicate::eq("a", 2)]),
        Predicate::ne("a", 3),
    ];

    for pred in cases {
        let solutions = plan_filter(
            pred,
            vec![
                asc_index("a_b_c", &["a", "b", "c"]),
                asc_index("a_1", &["a"]),
            ],
        );
        for solution in &solutions {
            for scan in index_scans(&solution.root) {
                let SolutionNode::IndexScan { index, bounds, .. } = scan else {
                    unreachable!();
                };
                assert_eq!(bounds.num_fields(), index.key_pattern.len());
                assert!(
                    !bounds
                        .fields
                        .iter()
                        .skip_while(|list| !list.is_all_values())
                        .any(|list| !list.is_all_values()),
                    "restrictive list after an unconstrained component",
                );
            }
        }
    }
}

#[test]
fn sort_matching_the_key_pattern_is_elided() {
    let query = CanonicalQuery::new(Predicate::gt("a", 0)).with_sort(SortPattern::asc("a"));
    let solutions = plan_query(&query, vec![asc_index("a_1", &["a"])]);
    assert!(!solutions[0].has_sort_stage);

    let flipped =
        CanonicalQuery::new(Predicate::gt("a", 0)).with_sort(SortPattern::asc("a").reversed());
    let solutions = plan_query(&flipped, vec![asc_index("a_1", &["a"])]);
    assert!(!solutions[0].has_sort_stage);
}

#[test]
fn every_leaf_is_consumed_or_refiltered() {
    // `a` is consumed exactly by its scan; the inexact `b` and unindexed
    // `z` must both reappear in the fetch filter.
    let pred = Predicate::and(vec![
        Predicate::eq("a", 1),
        Predicate::ne("b", Value::Int(2)),
        Predicate::eq("z", 3),
    ]);
    let solutions = plan_filter(
        pred,
        vec![asc_index("a_1", &["a"]), asc_index("b_1", &["b"])],
    );

    let SolutionNode::Fetch { filter, .. } = &solutions[0].root else {
        panic!("expected a filtering fetch");
    };
    let filter = filter.as_ref().expect("residual filter");
    assert!(filter.has_node(&|p| *p == Predicate::ne("b", 2)));
    assert!(filter.has_node(&|p| *p == Predicate::eq("z", 3)));
    assert!(!filter.has_node(&|p| *p == Predicate::eq("a", 1)));

    assert_eq!(index_scans(&solutions[0].root).len(), 2);
}

#[test]
fn sparse_index_on_null_equality_falls_back() {
    let index = asc_index("a_1", &["a"]).sparse();
    let solutions = plan_filter(Predicate::eq("a", Value::Null), vec![index]);

    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_collection_scan);
}
