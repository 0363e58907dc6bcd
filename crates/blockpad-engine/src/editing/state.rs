use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::editing::{Node, NodeId};

/// Immutable snapshot of the node sequence
///
/// This is the unit stored in the history log. Cloning is cheap (two `Arc`
/// bumps), and the id index is built once per snapshot so lookups are O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    nodes: Arc<[Node]>,
    index: Arc<HashMap<NodeId, usize>>,
}

impl DocumentState {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id, position))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(index.len(), nodes.len(), "node ids must be unique");

        Self {
            nodes: nodes.into(),
            index: Arc::new(index),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Position of `id` in the sequence
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.position(id).map(|position| &self.nodes[position])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Texts in document order
    pub fn texts(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::text).collect()
    }

    /// Compare against a later state
    ///
    /// Returns the ids present in `newer` that are new or whose node differs,
    /// and the ids of `self` missing from `newer`. Both lists follow document
    /// order of their respective states.
    pub fn diff(&self, newer: &DocumentState) -> (Vec<NodeId>, Vec<NodeId>) {
        let changed = newer
            .nodes
            .iter()
            .filter(|node| self.get(node.id) != Some(*node))
            .map(|node| node.id)
            .collect();

        let live: HashSet<NodeId> = newer.nodes.iter().map(|node| node.id).collect();
        let removed = self
            .nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| !live.contains(id))
            .collect();

        (changed, removed)
    }
}
