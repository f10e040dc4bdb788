//! Access-path construction from the rated predicate tree.
//!
//! Two passes. Tag assignment deterministically picks one index per
//! answerable leaf: each AND prefers the index that merges the most
//! children into one gap-free compound prefix (ties to the lowest catalog
//! ordinal), and children are reordered so same-index runs sit adjacent.
//! The rewrite pass then consumes tagged leaves into index scans; exact
//! leaves are detached from the working tree, inexact ones stay behind and
//! re-surface in the residual fetch filter.
//!
//! Inside an array operator the rewrite runs restricted: no detaching, no
//! fetch insertion, no compound merging. The enclosing ELEM_MATCH/ALL
//! re-applies its whole untouched subtree after one mandatory fetch, so a
//! partially consumed subtree here would corrupt matching semantics.

use crate::{
    index::IndexEntry,
    plan::{
        bounds::{translate, BoundsTightness, IndexBounds, OrderedIntervalList},
        rate::{key_position, RateMap},
        solution::SolutionNode,
        tree::{NodeId, NodeKind, WorkingTree},
    },
    predicate::Predicate,
    query::OrderDirection,
};
use std::collections::BTreeSet;

///
/// BuildMode
///
/// Threaded explicitly through every recursive build call so the
/// array-operator restrictions are visible at each site.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BuildMode {
    Unrestricted,
    InArrayOperator,
}

impl BuildMode {
    const fn restricted(self) -> bool {
        matches!(self, Self::InArrayOperator)
    }
}

///
/// IndexTag
///
/// The index (catalog ordinal into the relevant set) and compound key
/// position assigned to one leaf.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct IndexTag {
    pub ordinal: usize,
    pub position: usize,
}

///
/// TagMap
///
/// Side table from arena node id to assigned tag, discarded with the
/// planning call.
///

pub(crate) struct TagMap {
    tags: Vec<Option<IndexTag>>,
}

impl TagMap {
    #[must_use]
    fn with_len(len: usize) -> Self {
        Self {
            tags: vec![None; len],
        }
    }

    #[must_use]
    pub(crate) fn get(&self, id: NodeId) -> Option<IndexTag> {
        self.tags[id.index()]
    }

    fn set(&mut self, id: NodeId, tag: IndexTag) {
        self.tags[id.index()] = Some(tag);
    }
}

/// Assign one index tag per answerable leaf and reorder AND/OR children so
/// same-index runs are adjacent.
#[must_use]
pub(crate) fn assign_tags(
    tree: &mut WorkingTree,
    rate: &RateMap,
    indices: &[IndexEntry],
) -> TagMap {
    let mut tags = TagMap::with_len(tree.len());
    let root = tree.root();
    assign_node(tree, root, rate, indices, &mut tags);
    tags
}

fn assign_node(
    tree: &mut WorkingTree,
    node: NodeId,
    rate: &RateMap,
    indices: &[IndexEntry],
    tags: &mut TagMap,
) {
    if tree.kind(node).can_use_index_on_own_field() {
        tag_lone_leaf(node, rate, tags);
        return;
    }
    if matches!(tree.kind(node), NodeKind::And) {
        assign_and(tree, node, rate, indices, tags);
        return;
    }

    let is_or = matches!(tree.kind(node), NodeKind::Or);
    let children = tree.children(node).to_vec();
    for &child in &children {
        assign_node(tree, child, rate, indices, tags);
    }
    if is_or {
        reorder_by_tag(tree, node, tags);
    }
}

fn assign_and(
    tree: &mut WorkingTree,
    node: NodeId,
    rate: &RateMap,
    indices: &[IndexEntry],
    tags: &mut TagMap,
) {
    let children = tree.children(node).to_vec();

    let mut ordinals = BTreeSet::new();
    for &child in &children {
        if let Some(relevant) = rate.get(child) {
            ordinals.extend(relevant.first.iter().copied());
            ordinals.extend(relevant.not_first.iter().copied());
        }
    }

    // The compound group: the index merging the most children into a
    // gap-free key prefix. Ascending ordinal iteration makes the lowest
    // ordinal win ties.
    let mut best: Option<(usize, usize, Vec<(NodeId, usize)>)> = None;
    for &ordinal in &ordinals {
        let index = &indices[ordinal];
        let mut members = Vec::new();
        for &child in &children {
            let Some(relevant) = rate.get(child) else {
                continue;
            };
            if !relevant.first.contains(&ordinal) && !relevant.not_first.contains(&ordinal) {
                continue;
            }
            let path = match tree.kind(child) {
                NodeKind::Text(_) => None,
                _ => Some(&relevant.path),
            };
            if let Some(position) = key_position(index, tree.kind(child), path) {
                members.push((child, position));
            }
        }

        let covered: BTreeSet<usize> = members.iter().map(|(_, position)| *position).collect();
        let mut chain = 0;
        while covered.contains(&chain) {
            chain += 1;
        }
        members.retain(|(_, position)| *position < chain);

        let score = members.len();
        if score >= 2 && best.as_ref().is_none_or(|(top, _, _)| score > *top) {
            best = Some((score, ordinal, members));
        }
    }

    if let Some((_, ordinal, members)) = best {
        for (child, position) in members {
            tags.set(child, IndexTag { ordinal, position });
        }
    }

    // Leaves outside the group take the lowest index that leads with their
    // field. A leaf usable only at a later key position stays untagged and
    // ends up in the residual filter.
    for &child in &children {
        if tags.get(child).is_none() && tree.kind(child).can_use_index_on_own_field() {
            tag_lone_leaf(child, rate, tags);
        }
    }

    reorder_by_tag(tree, node, tags);

    for &child in &children {
        if !tree.kind(child).can_use_index_on_own_field() {
            assign_node(tree, child, rate, indices, tags);
        }
    }
}

fn tag_lone_leaf(node: NodeId, rate: &RateMap, tags: &mut TagMap) {
    if let Some(relevant) = rate.get(node) {
        // `first` is built in ascending ordinal order.
        if let Some(&ordinal) = relevant.first.first() {
            tags.set(
                node,
                IndexTag {
                    ordinal,
                    position: 0,
                },
            );
        }
    }
}

// Tagged children first, grouped by index then key position; the stable
// sort keeps the original order everywhere else.
fn reorder_by_tag(tree: &mut WorkingTree, node: NodeId, tags: &TagMap) {
    let mut order = tree.children(node).to_vec();
    order.sort_by_key(|id| {
        tags.get(*id)
            .map_or((usize::MAX, usize::MAX), |tag| (tag.ordinal, tag.position))
    });
    tree.reorder_children(node, order);
}

#[derive(Clone, Copy)]
enum MergeOp {
    Intersect,
    Union,
}

///
/// ScanBuilder
///
/// Accumulates per-component interval lists for one index scan. Trailing
/// unassigned components fill with the all-values interval at finish, and
/// each list is flipped where its key component runs descending so the
/// attached bounds follow storage order.
///

struct ScanBuilder<'a> {
    index: &'a IndexEntry,
    lists: Vec<Option<OrderedIntervalList>>,
    tightness: BoundsTightness,
}

impl<'a> ScanBuilder<'a> {
    fn new(index: &'a IndexEntry) -> Self {
        Self {
            index,
            lists: vec![None; index.key_pattern.len()],
            tightness: BoundsTightness::Exact,
        }
    }

    /// Fold one leaf into the bounds at `position`, returning that leaf's
    /// own tightness so the caller can decide whether the leaf is consumed.
    fn add(&mut self, position: usize, kind: &NodeKind, merge: MergeOp) -> BoundsTightness {
        let component = &self.index.key_pattern[position];
        let (list, tightness) = translate(kind, component);

        let slot = &mut self.lists[position];
        *slot = Some(match slot.take() {
            Some(existing) => match merge {
                MergeOp::Intersect => existing.intersect(&list),
                MergeOp::Union => existing.union(&list),
            },
            None => list,
        });

        self.tightness = self.tightness.combine(tightness);
        tightness
    }

    fn force_inexact(&mut self) {
        self.tightness = BoundsTightness::Inexact;
    }

    fn finish(self) -> SolutionNode {
        // Assigned slots must form a leading prefix of the key pattern. The
        // check is on assignment, not interval shape: a geo or text leaf
        // legitimately binds its component to the all-values interval.
        debug_assert!(
            !self
                .lists
                .iter()
                .skip_while(|slot| slot.is_some())
                .any(Option::is_some),
            "assigned bounds after an unassigned component",
        );

        let fields: Vec<OrderedIntervalList> = self
            .index
            .key_pattern
            .iter()
            .zip(self.lists)
            .map(|(component, list)| {
                list.unwrap_or_else(|| OrderedIntervalList::all_values(component.path.clone()))
            })
            .collect();

        let mut bounds = IndexBounds::new(fields);
        for (component, list) in self.index.key_pattern.iter().zip(&mut bounds.fields) {
            if component.kind.is_descending() {
                list.reverse();
            }
        }

        SolutionNode::IndexScan {
            index: self.index.clone(),
            bounds,
            direction: OrderDirection::Asc,
            tightness: self.tightness,
        }
    }
}

/// Rewrite the tagged subtree at `node` into an access path. `None` means
/// no index serves this subtree; the caller decides the fallback.
pub(crate) fn build_indexed_data_access(
    tree: &mut WorkingTree,
    tags: &TagMap,
    indices: &[IndexEntry],
    node: NodeId,
    mode: BuildMode,
) -> Option<SolutionNode> {
    if tree.kind(node).can_use_index_on_own_field() {
        return build_leaf(tree, tags, indices, node, mode);
    }

    match tree.kind(node).clone() {
        NodeKind::And => build_and(tree, tags, indices, node, mode),
        NodeKind::Or => build_or(tree, tags, indices, node, mode),
        NodeKind::ElemMatch { .. } if !mode.restricted() => {
            let inner = tree.child(node, 0);
            let access =
                build_indexed_data_access(tree, tags, indices, inner, BuildMode::InArrayOperator)?;
            Some(SolutionNode::Fetch {
                filter: Some(tree.render(node)),
                child: Box::new(access),
            })
        }
        NodeKind::All { .. } if !mode.restricted() => {
            let children = tree.children(node).to_vec();
            let mut scans = Vec::new();
            for child in children {
                if let Some(access) = build_indexed_data_access(
                    tree,
                    tags,
                    indices,
                    child,
                    BuildMode::InArrayOperator,
                ) {
                    scans.push(access);
                }
            }
            if scans.is_empty() {
                return None;
            }

            let base = if scans.len() == 1 {
                scans.remove(0)
            } else {
                SolutionNode::AndHash { children: scans }
            };
            Some(SolutionNode::Fetch {
                filter: Some(tree.render(node)),
                child: Box::new(base),
            })
        }
        // Negations and atomic subtrees never come from an index; nested
        // array operators are unreachable from inside a restricted build.
        _ => None,
    }
}

fn build_leaf(
    tree: &WorkingTree,
    tags: &TagMap,
    indices: &[IndexEntry],
    node: NodeId,
    mode: BuildMode,
) -> Option<SolutionNode> {
    let tag = tags.get(node)?;
    if tag.position != 0 {
        return None;
    }

    let index = &indices[tag.ordinal];
    let mut builder = ScanBuilder::new(index);
    builder.add(tag.position, tree.kind(node), MergeOp::Intersect);
    if index.multikey {
        builder.force_inexact();
    }

    let exact = builder.tightness.is_exact();
    let scan = builder.finish();

    if exact || mode.restricted() {
        Some(scan)
    } else {
        Some(SolutionNode::Fetch {
            filter: Some(tree.render(node)),
            child: Box::new(scan),
        })
    }
}

fn build_and(
    tree: &mut WorkingTree,
    tags: &TagMap,
    indices: &[IndexEntry],
    node: NodeId,
    mode: BuildMode,
) -> Option<SolutionNode> {
    if mode.restricted() {
        return build_and_restricted(tree, tags, indices, node);
    }

    let children = tree.children(node).to_vec();
    let mut scans = Vec::new();
    let mut consumed: Vec<NodeId> = Vec::new();

    let mut i = 0;
    while i < children.len() {
        let Some(tag) = tags.get(children[i]).filter(|_| {
            tree.kind(children[i]).can_use_index_on_own_field()
        }) else {
            i += 1;
            continue;
        };

        // Adjacent children on the same index form one merged scan.
        let mut run = vec![(children[i], tag)];
        let mut j = i + 1;
        while j < children.len() {
            match tags.get(children[j]) {
                Some(next) if next.ordinal == tag.ordinal => {
                    run.push((children[j], next));
                    j += 1;
                }
                _ => break,
            }
        }
        i = j;

        let index = &indices[tag.ordinal];
        if index.multikey {
            // Array semantics forbid combining per-element bounds; one
            // member anchors an inexact scan and every member stays in the
            // residual filter.
            if let Some((leaf, leaf_tag)) = run.iter().find(|(_, t)| t.position == 0) {
                let mut builder = ScanBuilder::new(index);
                builder.add(leaf_tag.position, tree.kind(*leaf), MergeOp::Intersect);
                builder.force_inexact();
                scans.push(builder.finish());
            }
            continue;
        }

        debug_assert_eq!(run[0].1.position, 0, "merged run must anchor the key prefix");

        let mut builder = ScanBuilder::new(index);
        for (leaf, leaf_tag) in &run {
            let tightness = builder.add(leaf_tag.position, tree.kind(*leaf), MergeOp::Intersect);
            if tightness.is_exact() {
                consumed.push(*leaf);
            }
        }
        scans.push(builder.finish());
    }

    if scans.is_empty() {
        return None;
    }

    for leaf in consumed {
        if let Some(position) = tree.children(node).iter().position(|c| *c == leaf) {
            tree.detach_child(node, position);
        }
    }

    let residual = (tree.child_count(node) > 0).then(|| tree.render(node));
    let base = combine_intersection(scans);

    match residual {
        Some(filter) => Some(SolutionNode::Fetch {
            filter: Some(filter),
            child: Box::new(base),
        }),
        None => Some(base),
    }
}

// No detaching, no fetches, no merging: every position-zero tagged leaf
// becomes its own scan and the parent array operator re-applies the whole
// subtree.
fn build_and_restricted(
    tree: &WorkingTree,
    tags: &TagMap,
    indices: &[IndexEntry],
    node: NodeId,
) -> Option<SolutionNode> {
    let mut scans = Vec::new();
    for &child in tree.children(node) {
        if !tree.kind(child).can_use_index_on_own_field() {
            continue;
        }
        let Some(tag) = tags.get(child) else {
            continue;
        };
        if tag.position != 0 {
            continue;
        }

        let index = &indices[tag.ordinal];
        let mut builder = ScanBuilder::new(index);
        builder.add(0, tree.kind(child), MergeOp::Intersect);
        if index.multikey {
            builder.force_inexact();
        }
        scans.push(builder.finish());
    }

    if scans.is_empty() {
        None
    } else {
        Some(combine_intersection(scans))
    }
}

fn build_or(
    tree: &mut WorkingTree,
    tags: &TagMap,
    indices: &[IndexEntry],
    node: NodeId,
    mode: BuildMode,
) -> Option<SolutionNode> {
    let children = tree.children(node).to_vec();
    let mut branches = Vec::new();

    let mut i = 0;
    while i < children.len() {
        let child = children[i];

        if !tree.kind(child).can_use_index_on_own_field() {
            // A branch that cannot resolve sinks the whole OR: the union
            // must cover every branch, so none may be dropped.
            let access = build_indexed_data_access(tree, tags, indices, child, mode)?;
            branches.push(access);
            i += 1;
            continue;
        }

        let tag = tags.get(child)?;
        if tag.position != 0 {
            return None;
        }
        let index = &indices[tag.ordinal];

        if mode.restricted() || index.multikey {
            let mut builder = ScanBuilder::new(index);
            let tightness = builder.add(0, tree.kind(child), MergeOp::Union);
            if index.multikey {
                builder.force_inexact();
            }
            let scan = builder.finish();

            if mode.restricted() || (tightness.is_exact() && !index.multikey) {
                branches.push(scan);
            } else {
                branches.push(SolutionNode::Fetch {
                    filter: Some(tree.render(child)),
                    child: Box::new(scan),
                });
            }
            i += 1;
            continue;
        }

        // Adjacent same-index leaves union into one scan over the shared
        // leading field.
        let mut run = vec![child];
        let mut j = i + 1;
        while j < children.len() {
            match tags.get(children[j]) {
                Some(next)
                    if next.ordinal == tag.ordinal
                        && tree.kind(children[j]).can_use_index_on_own_field() =>
                {
                    run.push(children[j]);
                    j += 1;
                }
                _ => break,
            }
        }
        i = j;

        let mut builder = ScanBuilder::new(index);
        let mut exact = true;
        for &leaf in &run {
            if !builder.add(0, tree.kind(leaf), MergeOp::Union).is_exact() {
                exact = false;
            }
        }
        let scan = builder.finish();

        if exact {
            branches.push(scan);
        } else {
            let mut rendered: Vec<Predicate> =
                run.iter().map(|leaf| tree.render(*leaf)).collect();
            let filter = if rendered.len() == 1 {
                rendered.remove(0)
            } else {
                Predicate::Or(rendered)
            };
            branches.push(SolutionNode::Fetch {
                filter: Some(filter),
                child: Box::new(scan),
            });
        }
    }

    if branches.len() == 1 {
        Some(branches.remove(0))
    } else {
        Some(SolutionNode::Or { children: branches })
    }
}

// Sorted intersection streams without hash-table memory, so it wins
// whenever every input arrives in record-id order.
fn combine_intersection(mut scans: Vec<SolutionNode>) -> SolutionNode {
    debug_assert!(!scans.is_empty(), "intersection of zero scans");

    if scans.len() == 1 {
        scans.remove(0)
    } else if scans.iter().all(SolutionNode::sorted_by_record_id) {
        SolutionNode::AndSorted { children: scans }
    } else {
        SolutionNode::AndHash { children: scans }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::{KeyComponent, KeyKind},
        plan::{
            bounds::Interval,
            rate::rate_indices,
        },
        predicate::{GeoSystem, Predicate},
        value::Value,
    };

    fn build(pred: &Predicate, indices: &[IndexEntry]) -> Option<SolutionNode> {
        let mut tree = WorkingTree::from_predicate(pred);
        let rate = rate_indices(&tree, indices);
        let tags = assign_tags(&mut tree, &rate, indices);
        let root = tree.root();
        build_indexed_data_access(&mut tree, &tags, indices, root, BuildMode::Unrestricted)
    }

    #[test]
    fn compound_equality_and_range_merge_into_one_exact_scan() {
        let indices = vec![IndexEntry::new(
            "a_b",
            vec![KeyComponent::asc("a"), KeyComponent::asc("b")],
        )];
        let pred = Predicate::and(vec![
            Predicate::eq("a", 5),
            Predicate::gt("b", 2),
            Predicate::lt("b", 8),
        ]);

        let Some(SolutionNode::IndexScan {
            bounds, tightness, ..
        }) = build(&pred, &indices)
        else {
            panic!("expected a bare index scan");
        };

        assert!(tightness.is_exact());
        assert_eq!(bounds.num_fields(), 2);
        assert_eq!(
            bounds.fields[0].intervals,
            vec![Interval::point(Value::Int(5))],
        );
        assert_eq!(
            bounds.fields[1].intervals,
            vec![Interval::new(Value::Int(2), Value::Int(8), false, false)],
        );
    }

    #[test]
    fn inexact_leaf_keeps_a_residual_fetch() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")])];
        let pred = Predicate::ne("a", 3);

        let Some(SolutionNode::Fetch { filter, child }) = build(&pred, &indices) else {
            panic!("expected fetch over scan");
        };
        assert_eq!(filter, Some(Predicate::ne("a", 3)));
        assert!(matches!(*child, SolutionNode::IndexScan { .. }));
    }

    #[test]
    fn unindexed_sibling_becomes_the_fetch_filter() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")])];
        let pred = Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("z", 2)]);

        let Some(SolutionNode::Fetch { filter, child }) = build(&pred, &indices) else {
            panic!("expected fetch over scan");
        };
        assert_eq!(filter, Some(Predicate::eq("z", 2)));
        assert!(matches!(*child, SolutionNode::IndexScan { .. }));
    }

    #[test]
    fn or_over_two_indices_builds_two_exact_scans() {
        let indices = vec![
            IndexEntry::new("a_1", vec![KeyComponent::asc("a")]),
            IndexEntry::new("b_1", vec![KeyComponent::asc("b")]),
        ];
        let pred = Predicate::or(vec![Predicate::eq("a", 1), Predicate::eq("b", 2)]);

        let Some(SolutionNode::Or { children }) = build(&pred, &indices) else {
            panic!("expected an or node");
        };
        assert_eq!(children.len(), 2);
        assert!(children
            .iter()
            .all(|child| matches!(child, SolutionNode::IndexScan { .. })));
    }

    #[test]
    fn or_unions_same_field_equalities_into_one_scan() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")])];
        let pred = Predicate::or(vec![Predicate::eq("a", 1), Predicate::eq("a", 7)]);

        let Some(SolutionNode::IndexScan { bounds, .. }) = build(&pred, &indices) else {
            panic!("expected a single unioned scan");
        };
        assert_eq!(
            bounds.fields[0].intervals,
            vec![Interval::point(Value::Int(1)), Interval::point(Value::Int(7))],
        );
    }

    #[test]
    fn or_with_an_unindexed_branch_fails() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")])];
        let pred = Predicate::or(vec![Predicate::eq("a", 1), Predicate::eq("z", 2)]);
        assert!(build(&pred, &indices).is_none());
    }

    #[test]
    fn two_lone_indices_intersect() {
        let indices = vec![
            IndexEntry::new("a_1", vec![KeyComponent::asc("a")]),
            IndexEntry::new("b_1", vec![KeyComponent::asc("b")]),
        ];
        let pred = Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("b", 2)]);

        let Some(SolutionNode::AndSorted { children }) = build(&pred, &indices) else {
            panic!("expected sorted intersection of point scans");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn elem_match_refetches_the_whole_subtree() {
        let indices = vec![IndexEntry::new(
            "items_qty",
            vec![KeyComponent::asc("items.qty")],
        )];
        let pred = Predicate::elem_match(
            "items",
            Predicate::and(vec![Predicate::eq("qty", 4), Predicate::eq("color", "red")]),
        );

        let Some(SolutionNode::Fetch { filter, child }) = build(&pred, &indices) else {
            panic!("expected mandatory fetch");
        };
        assert_eq!(filter, Some(pred.clone()));
        assert!(matches!(*child, SolutionNode::IndexScan { .. }));
    }

    #[test]
    fn geo_leading_component_still_binds_a_trailing_bound() {
        let indices = vec![IndexEntry::new(
            "loc_b",
            vec![
                KeyComponent::new("loc", KeyKind::TwoD),
                KeyComponent::asc("b"),
            ],
        )];
        let geo = Predicate::geo("loc", GeoSystem::Flat, Value::List(vec![]));
        let pred = Predicate::and(vec![geo.clone(), Predicate::eq("b", 2)]);

        let Some(SolutionNode::Fetch { filter, child }) = build(&pred, &indices) else {
            panic!("expected a recheck fetch");
        };
        // The geo leaf re-checks on fetch; the exact `b` leaf is consumed.
        assert_eq!(filter, Some(geo));

        let SolutionNode::IndexScan {
            bounds, tightness, ..
        } = *child
        else {
            panic!("expected a single merged scan");
        };
        assert_eq!(tightness, BoundsTightness::Inexact);
        assert!(bounds.fields[0].is_all_values());
        assert_eq!(
            bounds.fields[1].intervals,
            vec![Interval::point(Value::Int(2))],
        );
    }

    #[test]
    fn multikey_index_never_merges_bounds() {
        let indices = vec![IndexEntry::new(
            "a_b",
            vec![KeyComponent::asc("a"), KeyComponent::asc("b")],
        )
        .multikey()];
        let pred = Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("b", 2)]);

        let Some(SolutionNode::Fetch { filter, child }) = build(&pred, &indices) else {
            panic!("expected fetch over an inexact scan");
        };
        assert_eq!(filter, Some(pred.clone()));

        let SolutionNode::IndexScan {
            bounds, tightness, ..
        } = *child
        else {
            panic!("expected a single scan");
        };
        assert_eq!(tightness, BoundsTightness::Inexact);
        assert_eq!(
            bounds.fields[0].intervals,
            vec![Interval::point(Value::Int(1))],
        );
        assert!(bounds.fields[1].is_all_values());
    }
}
