//! Structural key policy.
//!
//! Decides which keys turn into structural commands (split, merge, move focus,
//! new block) given where the caret is. Everything else is ordinary typing and
//! stays with the surface, which reports the resulting text through
//! [`Cmd::UpdateText`].
//!
//! | Key | When | Command |
//! |---|---|---|
//! | Enter | always | [`Cmd::Split`] at the caret |
//! | Backspace | caret at 0 and a previous node exists | [`Cmd::MergeWithPrevious`] |
//! | Delete | caret at the end and a next node exists | [`Cmd::MergeWithNext`] |
//! | ArrowUp | a previous node exists | [`Cmd::FocusPrevious`] |
//! | ArrowDown | a next node exists | [`Cmd::FocusNext`] |
//! | click on empty area | always | [`Cmd::InsertBlank`] appending |

use crate::editing::{Caret, Cmd, DocumentStore, EditError, Patch};

/// Keys with structural meaning
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    /// Pointer press on the document outside every block
    ClickEmptyArea,
}

/// Command for `key` pressed with the caret at `caret`
///
/// `None` means the key has no structural effect here: a Backspace in the
/// middle of a word, an ArrowUp on the first node, or a caret naming a node
/// that is gone.
pub fn command_for_key(doc: &DocumentStore, key: Key, caret: Option<Caret>) -> Option<Cmd> {
    if key == Key::ClickEmptyArea {
        return Some(Cmd::InsertBlank { after: None });
    }

    let Caret { id, offset } = caret?;
    let node = doc.node(id)?;

    match key {
        Key::Enter => Some(Cmd::Split { id, at: offset }),
        Key::Backspace if offset == 0 && doc.get_previous(id).is_some() => {
            Some(Cmd::MergeWithPrevious { id })
        }
        Key::Delete if offset >= node.char_len() && doc.get_next(id).is_some() => {
            Some(Cmd::MergeWithNext { id })
        }
        Key::ArrowUp if doc.get_previous(id).is_some() => {
            Some(Cmd::FocusPrevious { id, column: offset })
        }
        Key::ArrowDown if doc.get_next(id).is_some() => Some(Cmd::FocusNext { id, column: offset }),
        _ => None,
    }
}

impl DocumentStore {
    /// Run the structural policy for `key` and apply the resulting command
    ///
    /// `Ok(None)` means the key was not structural and nothing happened.
    pub fn dispatch(&mut self, key: Key, caret: Option<Caret>) -> Result<Option<Patch>, EditError> {
        match command_for_key(self, key, caret) {
            Some(cmd) => self.apply(cmd).map(Some),
            None => Ok(None),
        }
    }
}
