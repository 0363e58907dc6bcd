// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use blockpad_engine::{DocumentStore, NodeId};

#[allow(dead_code)]
pub fn generate_paragraph(index: usize) -> String {
    format!(
        "Block {index} with some content. This helps create realistic block sizes for benchmarking."
    )
}

/// Document with `blocks` filled paragraphs, built through the public API
#[allow(dead_code)]
pub fn generate_document(blocks: usize) -> DocumentStore {
    let mut doc = DocumentStore::new();
    let first = doc.nodes()[0].id();
    doc.update_text(first, generate_paragraph(0)).unwrap();

    let mut last = first;
    for index in 1..blocks {
        last = doc.create_blank_at(Some(last));
        doc.update_text(last, generate_paragraph(index)).unwrap();
    }
    doc
}

/// Id of the block in the middle of the document
#[allow(dead_code)]
pub fn middle_id(doc: &DocumentStore) -> NodeId {
    doc.nodes()[doc.len() / 2].id()
}
