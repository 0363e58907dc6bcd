use std::collections::HashMap;

use crate::editing::NodeId;

/// Last known caret offset per node
///
/// Lives beside the node sequence rather than inside it, so a block losing
/// focus (or being re-rendered) does not forget where its caret was. Offsets
/// are char counts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CursorRegistry {
    positions: HashMap<NodeId, usize>,
}

impl CursorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the caret for `id`, replacing any previous value
    pub fn set(&mut self, id: NodeId, position: usize) {
        self.positions.insert(id, position);
    }

    /// Stored caret for `id`, or 0 when nothing was recorded
    pub fn get(&self, id: NodeId) -> usize {
        self.positions.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Forget the caret of a node that left the document
    pub fn remove(&mut self, id: NodeId) -> Option<usize> {
        self.positions.remove(&id)
    }

    /// Drop every entry whose node fails `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.positions.retain(|id, _| keep(*id));
    }

    /// Clamp a stored caret so it does not point past `len`
    pub fn clamp(&mut self, id: NodeId, len: usize) {
        if let Some(position) = self.positions.get_mut(&id) {
            *position = (*position).min(len);
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
