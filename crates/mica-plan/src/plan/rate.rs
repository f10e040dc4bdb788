//! Index relevance and compatibility rating.
//!
//! Reduces the catalog to indices whose leading key path overlaps a
//! predicate field, then annotates every answerable leaf with the relevant
//! indices and key positions that can serve it. The annotation lives in a
//! side table keyed by arena node id and is discarded with the planning
//! call.

use crate::{
    field::FieldPath,
    index::{IndexEntry, KeyComponent, KeyKind},
    plan::tree::{NodeId, NodeKind, WorkingTree},
    predicate::{CompareOp, GeoSystem},
};
use std::collections::BTreeSet;

///
/// RelevantTag
///
/// Which relevant indices can answer one leaf: ordinals of indices where
/// the leaf's path is the leading key component (`first`) and where it
/// appears at a later position (`not_first`). A later position is only
/// usable when AND-siblings fill every earlier one.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RelevantTag {
    pub path: FieldPath,
    pub first: Vec<usize>,
    pub not_first: Vec<usize>,
}

impl RelevantTag {
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.first.is_empty() && self.not_first.is_empty()
    }
}

///
/// RateMap
///
/// Side table from arena node id to relevant-index tag. Only leaves that
/// can use an index on their own field get an entry.
///

pub(crate) struct RateMap {
    tags: Vec<Option<RelevantTag>>,
}

impl RateMap {
    #[must_use]
    fn with_len(len: usize) -> Self {
        Self {
            tags: vec![None; len],
        }
    }

    #[must_use]
    pub(crate) fn get(&self, id: NodeId) -> Option<&RelevantTag> {
        self.tags[id.index()].as_ref()
    }
}

/// Collect every field path the predicate tree constrains, threading
/// array-operator prefixes. These are the only paths an index can help
/// with.
pub(crate) fn collect_fields(
    tree: &WorkingTree,
    node: NodeId,
    prefix: &str,
    out: &mut BTreeSet<FieldPath>,
) {
    let kind = tree.kind(node);

    if kind.can_use_index_on_own_field() {
        if let Some(path) = kind.own_path() {
            out.insert(FieldPath::concat(prefix, path.as_str()));
        }
    } else if kind.array_uses_index_on_children() {
        let prefix = array_prefix(kind, prefix);
        for child in tree.children(node) {
            collect_fields(tree, *child, &prefix, out);
        }
    } else if kind.is_logical() {
        for child in tree.children(node) {
            collect_fields(tree, *child, prefix, out);
        }
    }
}

/// Keep only indices whose leading key path is prefix-compatible with some
/// constrained field. Everything else can never contribute to a plan and
/// is dropped before the expensive rating step. Text predicates constrain
/// no field, so when one is present any index with a text component stays
/// relevant too.
#[must_use]
pub(crate) fn find_relevant_indices(
    fields: &BTreeSet<FieldPath>,
    needs_text: bool,
    catalog: &[IndexEntry],
) -> Vec<IndexEntry> {
    catalog
        .iter()
        .filter(|index| {
            if needs_text
                && index
                    .key_pattern
                    .iter()
                    .any(|component| component.kind == KeyKind::Text)
            {
                return true;
            }

            let first = &index.first_component().path;
            fields.iter().any(|field| first.is_prefix_compatible(field))
        })
        .cloned()
        .collect()
}

/// Whether the key component `component` of `index` can answer the leaf
/// `kind`. The caller has already matched the component's path against the
/// leaf's full path (text leaves excepted, they have no path).
#[must_use]
pub(crate) fn compatible(component: &KeyComponent, index: &IndexEntry, kind: &NodeKind) -> bool {
    match component.kind {
        KeyKind::Asc | KeyKind::Desc => match kind {
            NodeKind::Compare(cmp) => {
                // A sparse index has no entry for documents missing the
                // field, so it cannot answer an equality against null.
                !(index.sparse && cmp.op == CompareOp::Eq && cmp.value.is_null())
            }
            _ => false,
        },
        KeyKind::Hashed => matches!(
            kind,
            NodeKind::Compare(cmp) if matches!(cmp.op, CompareOp::Eq | CompareOp::In)
        ),
        KeyKind::TwoD => matches!(
            kind,
            NodeKind::Geo(geo) if geo.system == GeoSystem::Flat
        ),
        KeyKind::TwoDSphere => matches!(
            kind,
            NodeKind::Geo(geo) if geo.system == GeoSystem::Spherical
        ),
        KeyKind::Text => matches!(kind, NodeKind::Text(_)),
    }
}

/// The key position at which `index` can answer this leaf, if any. The
/// first compatible component wins.
#[must_use]
pub(crate) fn key_position(
    index: &IndexEntry,
    kind: &NodeKind,
    full_path: Option<&FieldPath>,
) -> Option<usize> {
    index.key_pattern.iter().position(|component| {
        let path_matches = match (full_path, &kind) {
            // Text predicates carry no path; they bind to the text
            // component wherever it sits.
            (None, NodeKind::Text(_)) => component.kind == KeyKind::Text,
            (Some(path), _) => component.path == *path,
            (None, _) => false,
        };
        path_matches && compatible(component, index, kind)
    })
}

/// Rate every leaf in the tree against the relevant indices, producing the
/// transient tag table.
#[must_use]
pub(crate) fn rate_indices(tree: &WorkingTree, indices: &[IndexEntry]) -> RateMap {
    let mut map = RateMap::with_len(tree.len());
    rate_node(tree, tree.root(), "", indices, &mut map);
    map
}

fn rate_node(
    tree: &WorkingTree,
    node: NodeId,
    prefix: &str,
    indices: &[IndexEntry],
    map: &mut RateMap,
) {
    let kind = tree.kind(node);

    if kind.can_use_index_on_own_field() {
        let full_path = kind
            .own_path()
            .map(|path| FieldPath::concat(prefix, path.as_str()));
        let mut tag = RelevantTag {
            path: full_path.clone().unwrap_or_default(),
            ..RelevantTag::default()
        };

        for (ordinal, index) in indices.iter().enumerate() {
            match key_position(index, kind, full_path.as_ref()) {
                Some(0) => tag.first.push(ordinal),
                Some(_) => tag.not_first.push(ordinal),
                None => {}
            }
        }

        map.tags[node.index()] = Some(tag);
    } else if kind.array_uses_index_on_children() {
        let prefix = array_prefix(kind, prefix);
        for child in tree.children(node) {
            rate_node(tree, *child, &prefix, indices, map);
        }
    } else if kind.is_logical() {
        for child in tree.children(node) {
            rate_node(tree, *child, prefix, indices, map);
        }
    }
}

// Extend the path prefix through an ElemMatch/All node. An empty operator
// path contributes nothing (e.g. the elemMatch embedded in an $all).
fn array_prefix(kind: &NodeKind, prefix: &str) -> String {
    match kind {
        NodeKind::ElemMatch { path } | NodeKind::All { path } => {
            FieldPath::concat(prefix, path.as_str()).as_str().to_string()
        }
        _ => prefix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{predicate::Predicate, value::Value};

    fn rate_one(pred: &Predicate, indices: &[IndexEntry]) -> (WorkingTree, RateMap) {
        let tree = WorkingTree::from_predicate(pred);
        let map = rate_indices(&tree, indices);
        (tree, map)
    }

    #[test]
    fn ordinary_index_rates_equality_and_range() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")])];

        let (tree, map) = rate_one(&Predicate::gt("a", 5), &indices);
        let tag = map.get(tree.root()).expect("tagged");
        assert_eq!(tag.first, vec![0]);
        assert!(tag.not_first.is_empty());
    }

    #[test]
    fn hashed_index_rejects_ranges() {
        let indices = vec![IndexEntry::new(
            "a_hashed",
            vec![KeyComponent::new("a", KeyKind::Hashed)],
        )];

        let (tree, map) = rate_one(&Predicate::eq("a", 5), &indices);
        assert_eq!(map.get(tree.root()).expect("tagged").first, vec![0]);

        let (tree, map) = rate_one(&Predicate::gt("a", 5), &indices);
        assert!(map.get(tree.root()).expect("tagged").is_empty());
    }

    #[test]
    fn sparse_index_rejects_null_equality() {
        let indices = vec![IndexEntry::new("a_1", vec![KeyComponent::asc("a")]).sparse()];

        let (tree, map) = rate_one(&Predicate::eq("a", Value::Null), &indices);
        assert!(map.get(tree.root()).expect("tagged").is_empty());

        let (tree, map) = rate_one(&Predicate::eq("a", 1), &indices);
        assert_eq!(map.get(tree.root()).expect("tagged").first, vec![0]);
    }

    #[test]
    fn compound_position_lands_in_not_first() {
        let indices = vec![IndexEntry::new(
            "a_b",
            vec![KeyComponent::asc("a"), KeyComponent::asc("b")],
        )];

        let pred = Predicate::and(vec![Predicate::eq("a", 1), Predicate::lt("b", 9)]);
        let (tree, map) = rate_one(&pred, &indices);

        let a_tag = map.get(tree.child(tree.root(), 0)).expect("a tagged");
        assert_eq!(a_tag.first, vec![0]);
        let b_tag = map.get(tree.child(tree.root(), 1)).expect("b tagged");
        assert_eq!(b_tag.not_first, vec![0]);
    }

    #[test]
    fn elem_match_children_rate_under_the_parent_path() {
        let indices = vec![IndexEntry::new(
            "items_qty",
            vec![KeyComponent::asc("items.qty")],
        )];

        let pred = Predicate::elem_match("items", Predicate::eq("qty", 4));
        let (tree, map) = rate_one(&pred, &indices);

        let inner = tree.child(tree.root(), 0);
        let tag = map.get(inner).expect("inner tagged");
        assert_eq!(tag.path, FieldPath::new("items.qty"));
        assert_eq!(tag.first, vec![0]);
    }

    #[test]
    fn geo_system_must_match_index_type() {
        let indices = vec![
            IndexEntry::new("loc_2d", vec![KeyComponent::new("loc", KeyKind::TwoD)]),
            IndexEntry::new(
                "loc_2ds",
                vec![KeyComponent::new("loc", KeyKind::TwoDSphere)],
            ),
        ];

        let pred = Predicate::geo("loc", GeoSystem::Flat, Value::List(vec![]));
        let (tree, map) = rate_one(&pred, &indices);
        assert_eq!(map.get(tree.root()).expect("tagged").first, vec![0]);

        let pred = Predicate::geo("loc", GeoSystem::Spherical, Value::List(vec![]));
        let (tree, map) = rate_one(&pred, &indices);
        assert_eq!(map.get(tree.root()).expect("tagged").first, vec![1]);
    }

    #[test]
    fn irrelevant_indices_are_filtered_before_rating() {
        let catalog = vec![
            IndexEntry::new("a_1", vec![KeyComponent::asc("a")]),
            IndexEntry::new("z_1", vec![KeyComponent::asc("z")]),
        ];

        let tree = WorkingTree::from_predicate(&Predicate::eq("a", 1));
        let mut fields = BTreeSet::new();
        collect_fields(&tree, tree.root(), "", &mut fields);

        let relevant = find_relevant_indices(&fields, false, &catalog);
        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].name, "a_1");
    }
}
