/*!
 * # Block Editing Core
 *
 * The document model for a block-structured plain-text editor: an ordered
 * sequence of independently editable text blocks ("nodes"), with a caret per
 * block and linear undo/redo over the whole document.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable snapshots as the single source of truth
 * - The node sequence lives in a [`DocumentState`]: an immutable, cheaply
 *   clonable value with an id index for O(1) lookup
 * - Every structural change builds a new state and commits it to the
 *   [`HistoryLog`], so each edit is exactly one undo step
 * - Nodes are never mutated in place; a node held by an old snapshot stays
 *   exactly as it was
 *
 * ### 2. Pure split and merge
 * - [`split_merge::split`] and [`split_merge::merge`] borrow their inputs and
 *   return fresh nodes
 * - The left half of a split and the target of a merge keep their identity;
 *   the right half of a split gets a new id from the document's [`NodeFactory`]
 *
 * ### 3. One owner for caret state
 * - [`CursorRegistry`] maps node ids to char offsets and outlives focus changes
 * - The document's active id is the only record of focus
 * - [`RenderBlock`] exposes both as read-only, derived fields
 *
 * ### 4. Command-based editing
 * - User-level edits are [`Cmd`] values applied with [`DocumentStore::apply`],
 *   which returns a [`Patch`] (changed ids, removed ids, resulting caret)
 * - [`keymap`] holds the policy deciding which keys become structural commands
 *
 * ### 5. Checked failure
 * - Unknown ids, edges of the sequence and self-merges come back as
 *   [`EditError`]; the document is unchanged whenever an error is returned
 *
 * ## Module Structure
 *
 * - **`node`**: `Node` and `NodeId`
 * - **`factory`**: `NodeFactory`, per-document identity source
 * - **`split_merge`**: pure structural transforms
 * - **`cursor`**: `CursorRegistry`
 * - **`history`**: generic `HistoryLog`
 * - **`state`**: `DocumentState`, the snapshot stored in history
 * - **`document`**: `DocumentStore`, the single writer
 * - **`commands`** / **`patch`**: the command vocabulary and its result
 * - **`keymap`**: structural key policy
 * - **`snapshot`**: render view
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockpad_engine::editing::*;
 *
 * let mut doc = DocumentStore::new();
 * let first = doc.nodes()[0].id();
 *
 * // The surface reports typing as whole-text updates
 * doc.apply(Cmd::UpdateText { id: first, text: "hello world".to_string() }).unwrap();
 *
 * // Enter at offset 5 splits the block and focuses the new one
 * let patch = doc.dispatch(Key::Enter, Some(Caret::new(first, 5))).unwrap().unwrap();
 * let second = patch.focus.unwrap().id;
 *
 * // Backspace at the start of the second block joins them back
 * doc.dispatch(Key::Backspace, Some(Caret::new(second, 0))).unwrap();
 * assert_eq!(doc.state().texts(), vec!["hello world"]);
 *
 * // Render from a snapshot
 * let snapshot = doc.snapshot();
 * assert_eq!(snapshot.active_block().unwrap().cursor_position, 5);
 * ```
 */

// Module exports
pub mod commands;
pub mod cursor;
pub mod document;
pub mod error;
pub mod factory;
pub mod history;
pub mod keymap;
pub mod node;
pub mod patch;
pub mod snapshot;
pub mod split_merge;
pub mod state;

// Public API re-exports
pub use commands::Cmd;
pub use cursor::CursorRegistry;
pub use document::DocumentStore;
pub use error::EditError;
pub use factory::NodeFactory;
pub use history::HistoryLog;
pub use keymap::{Key, command_for_key};
pub use node::{Node, NodeId};
pub use patch::{Caret, Patch};
pub use snapshot::{RenderBlock, Snapshot};
pub use state::DocumentState;
