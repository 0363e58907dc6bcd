use std::time::SystemTime;

use crate::editing::{Node, NodeId};

/// Builds nodes with fresh identity
///
/// Each document owns its own factory, so there is no process-wide counter.
/// Ids are random v4 UUIDs; `created` is kept only for diagnostics.
#[derive(Debug, Default, Clone)]
pub struct NodeFactory {
    created: u64,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node holding `text` with a new id and `edit_count` of zero
    pub fn create(&mut self, text: impl Into<String>) -> Node {
        self.created += 1;
        let node = Node {
            id: NodeId::new_v4(),
            text: text.into(),
            created_at: SystemTime::now(),
            edit_count: 0,
        };
        log::trace!("created node {} (#{})", node.id, self.created);
        node
    }

    /// Number of nodes this factory has produced
    pub fn created(&self) -> u64 {
        self.created
    }
}
