//! Arena-indexed working copy of the predicate tree.
//!
//! The builder rewrites the predicate tree destructively: exact leaves are
//! consumed into index bounds and detached, the remainder is re-rendered as
//! residual filter material. All of that mutation happens on this arena
//! copy, scoped to one planning call; the caller's tree is never touched.
//! Detaching removes a child from its parent's child list and returns its
//! id; the subtree stays resident in the arena until the call ends.

use crate::{
    field::FieldPath,
    predicate::{ComparePredicate, GeoPredicate, Predicate, TextPredicate},
};

///
/// NodeId
///
/// Index of a node in the arena. Side tables (relevant-index tags, build
/// tags) are keyed by this id, never stored on the node itself.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

///
/// NodeKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum NodeKind {
    And,
    Or,
    Not,
    Atomic,
    ElemMatch { path: FieldPath },
    All { path: FieldPath },
    Compare(ComparePredicate),
    Text(TextPredicate),
    Geo(GeoPredicate),
}

impl NodeKind {
    /// Leaf predicates that an index over their own field can answer.
    #[must_use]
    pub(crate) const fn can_use_index_on_own_field(&self) -> bool {
        matches!(self, Self::Compare(_) | Self::Text(_) | Self::Geo(_))
    }

    /// Array operators whose children, not the node itself, carry the
    /// indexable predicates.
    #[must_use]
    pub(crate) const fn array_uses_index_on_children(&self) -> bool {
        matches!(self, Self::ElemMatch { .. } | Self::All { .. })
    }

    #[must_use]
    pub(crate) const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not | Self::Atomic)
    }

    /// The field path this leaf compares on, relative to any array-operator
    /// prefix above it. Text predicates have no path of their own.
    #[must_use]
    pub(crate) const fn own_path(&self) -> Option<&FieldPath> {
        match self {
            Self::Compare(cmp) => Some(&cmp.path),
            Self::Geo(geo) => Some(&geo.path),
            _ => None,
        }
    }
}

struct WorkingNode {
    kind: NodeKind,
    children: Vec<NodeId>,
}

///
/// WorkingTree
///

pub(crate) struct WorkingTree {
    nodes: Vec<WorkingNode>,
    root: NodeId,
}

impl WorkingTree {
    #[must_use]
    pub(crate) fn from_predicate(predicate: &Predicate) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.insert(predicate);
        tree
    }

    fn insert(&mut self, predicate: &Predicate) -> NodeId {
        let (kind, child_preds): (NodeKind, &[Predicate]) = match predicate {
            Predicate::And(children) => (NodeKind::And, children),
            Predicate::Or(children) => (NodeKind::Or, children),
            Predicate::Not(inner) => (NodeKind::Not, std::slice::from_ref(inner)),
            Predicate::Atomic(inner) => (NodeKind::Atomic, std::slice::from_ref(inner)),
            Predicate::ElemMatch { path, inner } => (
                NodeKind::ElemMatch { path: path.clone() },
                std::slice::from_ref(inner),
            ),
            Predicate::All { path, children } => {
                (NodeKind::All { path: path.clone() }, children.as_slice())
            }
            Predicate::Compare(cmp) => (NodeKind::Compare(cmp.clone()), &[]),
            Predicate::Text(text) => (NodeKind::Text(text.clone()), &[]),
            Predicate::Geo(geo) => (NodeKind::Geo(geo.clone()), &[]),
        };

        let children = child_preds.iter().map(|child| self.insert(child)).collect();
        let id = NodeId(self.nodes.len());
        self.nodes.push(WorkingNode { kind, children });
        id
    }

    #[must_use]
    pub(crate) const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, for sizing side tables.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    #[must_use]
    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub(crate) fn child(&self, id: NodeId, position: usize) -> NodeId {
        self.nodes[id.0].children[position]
    }

    #[must_use]
    pub(crate) fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    /// Detach the `position`-th child of `parent`, returning ownership of
    /// the subtree to the caller.
    pub(crate) fn detach_child(&mut self, parent: NodeId, position: usize) -> NodeId {
        self.nodes[parent.0].children.remove(position)
    }

    /// Replace the child order of `parent`. The new order must be a
    /// permutation of the current children.
    pub(crate) fn reorder_children(&mut self, parent: NodeId, order: Vec<NodeId>) {
        debug_assert_eq!(
            order.len(),
            self.nodes[parent.0].children.len(),
            "child reorder must be a permutation",
        );
        self.nodes[parent.0].children = order;
    }

    /// Re-render the subtree rooted at `id` as an owned predicate, the form
    /// residual filters take in a solution. A single-child AND renders as
    /// its child.
    #[must_use]
    pub(crate) fn render(&self, id: NodeId) -> Predicate {
        let node = &self.nodes[id.0];
        let mut children: Vec<Predicate> =
            node.children.iter().map(|child| self.render(*child)).collect();

        match &node.kind {
            NodeKind::And => {
                if children.len() == 1 {
                    children.remove(0)
                } else {
                    Predicate::And(children)
                }
            }
            NodeKind::Or => Predicate::Or(children),
            NodeKind::Not => Predicate::Not(Box::new(children.remove(0))),
            NodeKind::Atomic => Predicate::Atomic(Box::new(children.remove(0))),
            NodeKind::ElemMatch { path } => Predicate::ElemMatch {
                path: path.clone(),
                inner: Box::new(children.remove(0)),
            },
            NodeKind::All { path } => Predicate::All {
                path: path.clone(),
                children,
            },
            NodeKind::Compare(cmp) => Predicate::Compare(cmp.clone()),
            NodeKind::Text(text) => Predicate::Text(text.clone()),
            NodeKind::Geo(geo) => Predicate::Geo(geo.clone()),
        }
    }
}
