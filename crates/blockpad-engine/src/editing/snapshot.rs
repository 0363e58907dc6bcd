use serde::Serialize;

use crate::editing::{DocumentStore, NodeId};

/// Immutable render view of a document
///
/// The surface paints from this and never touches the node sequence directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Document version for change detection
    pub version: u64,
    pub blocks: Vec<RenderBlock>,
}

/// One block as the surface sees it
///
/// `cursor_position` and `active` are derived from the cursor registry and the
/// document's active id at the moment the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBlock {
    pub id: NodeId,
    pub text: String,
    pub edit_count: u64,
    pub cursor_position: usize,
    pub active: bool,
}

impl Snapshot {
    pub fn active_block(&self) -> Option<&RenderBlock> {
        self.blocks.iter().find(|block| block.active)
    }

    pub fn block(&self, id: NodeId) -> Option<&RenderBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }
}

pub(crate) fn create_snapshot(doc: &DocumentStore) -> Snapshot {
    let active = doc.active();
    let blocks = doc
        .nodes()
        .iter()
        .map(|node| RenderBlock {
            id: node.id(),
            text: node.text().to_string(),
            edit_count: node.edit_count(),
            cursor_position: doc.cursor(node.id()),
            active: active == Some(node.id()),
        })
        .collect();

    Snapshot {
        version: doc.version(),
        blocks,
    }
}
