use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
///
/// Assigned once by [`NodeFactory`](crate::editing::NodeFactory) and never
/// reused. It is the join key between the node sequence, the cursor registry
/// and every history snapshot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub(crate) fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One independently editable block of text
///
/// A `Node` is plain data. Caret position and focus are deliberately absent:
/// they are owned by the [`CursorRegistry`](crate::editing::CursorRegistry) and
/// the document's active id, and surface as read-only fields on
/// [`RenderBlock`](crate::editing::RenderBlock).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) text: String,
    pub(crate) created_at: SystemTime,
    pub(crate) edit_count: u64,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Number of text mutations this node has seen (debugging aid only)
    pub fn edit_count(&self) -> u64 {
        self.edit_count
    }

    /// Length of the text in chars, the unit used for every offset
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Copy of this node with new text and a bumped edit counter
    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            id: self.id,
            text,
            created_at: self.created_at,
            edit_count: self.edit_count + 1,
        }
    }
}

/// Convert a char offset into a byte index, clamping past-the-end offsets
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
