//! Pure structural transforms over nodes.
//!
//! Neither function touches its inputs: both return fresh values, so a node held
//! in an older history snapshot can never be rewritten by a later split.

use crate::editing::node::byte_index;
use crate::editing::{Node, NodeFactory};

/// Split `node` at char offset `position`
///
/// The left half keeps the id, creation time and edit count of `node`. The
/// right half is a brand new node whose text has trailing whitespace removed.
/// An empty node or a zero offset yields the node unchanged plus a new empty
/// node; offsets past the end yield an empty right half.
pub fn split(node: &Node, position: usize, factory: &mut NodeFactory) -> (Node, Node) {
    if node.text.is_empty() || position == 0 {
        return (node.clone(), factory.create(""));
    }

    let at = byte_index(&node.text, position);
    let (head, tail) = node.text.split_at(at);

    let left = Node {
        text: head.to_string(),
        ..node.clone()
    };
    let right = factory.create(tail.trim_end());

    (left, right)
}

/// Merge `second` into `first`
///
/// The result carries `first`'s identity and creation time, the concatenated
/// text `first + second`, and `first.edit_count + 1`. Argument order matters.
pub fn merge(first: &Node, second: &Node) -> Node {
    let mut text = String::with_capacity(first.text.len() + second.text.len());
    text.push_str(&first.text);
    text.push_str(&second.text);
    first.with_text(text)
}
