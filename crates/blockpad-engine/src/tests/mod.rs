use serde::Serialize;

use crate::{DocumentStore, Node, NodeId};


/// Build a document whose nodes hold `texts`, in order, using public edits
pub fn create_test_document(texts: &[&str]) -> DocumentStore {
    let mut doc = DocumentStore::new();
    let first = doc.nodes()[0].id();
    doc.update_text(first, texts[0]).unwrap();

    let mut last = first;
    for text in &texts[1..] {
        last = doc.create_blank_at(Some(last));
        doc.update_text(last, *text).unwrap();
    }
    doc
}

pub fn node_ids(doc: &DocumentStore) -> Vec<NodeId> {
    doc.nodes().iter().map(Node::id).collect()
}

/// Id-free projection of a block, stable enough for snapshots
#[derive(Debug, Serialize)]
pub struct BlockView {
    pub text: String,
    pub edit_count: u64,
    pub cursor: usize,
    pub active: bool,
}

pub fn block_views(doc: &DocumentStore) -> Vec<BlockView> {
    doc.snapshot()
        .blocks
        .into_iter()
        .map(|block| BlockView {
            text: block.text,
            edit_count: block.edit_count,
            cursor: block.cursor_position,
            active: block.active,
        })
        .collect()
}
