use serde::Serialize;

use crate::editing::NodeId;

/// A caret inside one node, as a char offset from the start of its text
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Caret {
    pub id: NodeId,
    pub offset: usize,
}

impl Caret {
    pub fn new(id: NodeId, offset: usize) -> Self {
        Self { id, offset }
    }
}

/// Result of applying a command
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    /// Nodes that are new or whose content changed, in document order
    pub changed: Vec<NodeId>,
    /// Nodes that left the document
    pub removed: Vec<NodeId>,
    /// Active node and its caret after the command
    pub focus: Option<Caret>,
    pub version: u64,
}

impl Patch {
    /// True when the node sequence itself was not touched
    pub fn is_structural_noop(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}
