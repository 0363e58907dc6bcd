use crate::editing::NodeId;

/// Every user-level edit the document understands
///
/// Commands are applied through [`DocumentStore::apply`](crate::editing::DocumentStore::apply).
/// Offsets and columns are char counts.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert an empty node after `after`, or at the end when `None` or unknown
    InsertBlank { after: Option<NodeId> },
    /// Replace the whole text of a node (one keystroke from the surface)
    UpdateText { id: NodeId, text: String },
    /// Split a node at a char offset and focus the right half
    Split { id: NodeId, at: usize },
    /// Fold a node into its predecessor (Backspace at offset 0)
    MergeWithPrevious { id: NodeId },
    /// Pull the successor into a node (Delete at the end)
    MergeWithNext { id: NodeId },
    /// Fold `from` into `into`, regardless of where they sit
    Merge { into: NodeId, from: NodeId },
    /// Move focus to the previous node, keeping the column where possible
    FocusPrevious { id: NodeId, column: usize },
    /// Move focus to the next node, keeping the column where possible
    FocusNext { id: NodeId, column: usize },
    /// Focus a node and place its caret
    Focus { id: NodeId, at: usize },
    /// Delete a node outright
    Remove { id: NodeId },
    Undo,
    Redo,
}

impl Cmd {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::InsertBlank { .. } => "insert_blank",
            Cmd::UpdateText { .. } => "update_text",
            Cmd::Split { .. } => "split",
            Cmd::MergeWithPrevious { .. } => "merge_with_previous",
            Cmd::MergeWithNext { .. } => "merge_with_next",
            Cmd::Merge { .. } => "merge",
            Cmd::FocusPrevious { .. } => "focus_previous",
            Cmd::FocusNext { .. } => "focus_next",
            Cmd::Focus { .. } => "focus",
            Cmd::Remove { .. } => "remove",
            Cmd::Undo => "undo",
            Cmd::Redo => "redo",
        }
    }
}
