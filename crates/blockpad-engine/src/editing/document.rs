use crate::editing::{
    Caret, Cmd, CursorRegistry, DocumentState, EditError, HistoryLog, Node, NodeFactory, NodeId,
    Patch, Snapshot, split_merge,
};

/// Block document: an ordered sequence of nodes with focus, carets and history
///
/// `DocumentStore` is the single writer of a document. It keeps:
///
/// ## 1. The node sequence, inside the history log
/// - Every mutation builds a new [`DocumentState`] and commits it, so each edit
///   is exactly one undo step
/// - Reads (`nodes`, `get_previous`, `snapshot`, ...) never commit
///
/// ## 2. Focus and carets, outside the history log
/// - `active` names at most one node, always one present in the current state
/// - [`CursorRegistry`] remembers the caret of every node, including unfocused
///   ones, and is purged when nodes leave the document
///
/// ## 3. Identity
/// - A per-document [`NodeFactory`] hands out ids; left halves of splits and
///   surviving merge targets keep theirs
///
/// Refused operations return an [`EditError`] and leave every part of the
/// document untouched.
///
/// ```rust
/// use blockpad_engine::{Cmd, DocumentStore};
///
/// let mut doc = DocumentStore::new();
/// let first = doc.nodes()[0].id();
///
/// doc.update_text(first, "hello world").unwrap();
/// let patch = doc.apply(Cmd::Split { id: first, at: 5 }).unwrap();
///
/// assert_eq!(doc.state().texts(), vec!["hello", " world"]);
/// assert_eq!(patch.focus.unwrap().offset, 0);
///
/// doc.undo();
/// assert_eq!(doc.state().texts(), vec!["hello world"]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    history: HistoryLog<DocumentState>,
    cursors: CursorRegistry,
    factory: NodeFactory,
    active: Option<NodeId>,
    /// Incremented on every committed edit and every undo/redo step
    version: u64,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// A document holding one empty, active node
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Like [`DocumentStore::new`] but keeping at most `limit` undo snapshots
    pub fn with_history_limit(limit: usize) -> Self {
        Self::build(Some(limit))
    }

    fn build(limit: Option<usize>) -> Self {
        let mut factory = NodeFactory::new();
        let first = factory.create("");
        let id = first.id();
        let state = DocumentState::from_nodes(vec![first]);

        let history = match limit {
            Some(limit) => HistoryLog::with_limit(state, limit),
            None => HistoryLog::new(state),
        };

        let mut cursors = CursorRegistry::new();
        cursors.set(id, 0);

        Self {
            history,
            cursors,
            factory,
            active: Some(id),
            version: 0,
        }
    }

    // ============ Reads ============

    /// The current node sequence
    pub fn state(&self) -> &DocumentState {
        self.history.current()
    }

    pub fn nodes(&self) -> &[Node] {
        self.state().nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.state().get(id)
    }

    pub fn len(&self) -> usize {
        self.state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().is_empty()
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active_node(&self) -> Option<&Node> {
        self.active.and_then(|id| self.node(id))
    }

    /// Active node with its stored caret
    pub fn caret(&self) -> Option<Caret> {
        self.active.map(|id| Caret::new(id, self.cursor(id)))
    }

    /// Stored caret of `id` (0 when unknown)
    pub fn cursor(&self, id: NodeId) -> usize {
        self.cursors.get(id)
    }

    pub fn cursors(&self) -> &CursorRegistry {
        &self.cursors
    }

    pub fn history(&self) -> &HistoryLog<DocumentState> {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Node just before `id`, `None` at the start or for unknown ids
    pub fn get_previous(&self, id: NodeId) -> Option<&Node> {
        let position = self.state().position(id)?;
        let previous = position.checked_sub(1)?;
        self.nodes().get(previous)
    }

    /// Node just after `id`, `None` at the end or for unknown ids
    pub fn get_next(&self, id: NodeId) -> Option<&Node> {
        let position = self.state().position(id)?;
        self.nodes().get(position + 1)
    }

    pub fn snapshot(&self) -> Snapshot {
        crate::editing::snapshot::create_snapshot(self)
    }

    // ============ Structural edits ============

    /// Insert an empty node after `after` (append when absent or unknown) and focus it
    pub fn create_blank_at(&mut self, after: Option<NodeId>) -> NodeId {
        let node = self.factory.create("");
        let id = node.id();

        let mut nodes = self.nodes().to_vec();
        let at = after
            .and_then(|after| self.state().position(after))
            .map(|position| position + 1)
            .unwrap_or(nodes.len());
        nodes.insert(at, node);

        self.commit(nodes, "create_blank_at");
        self.activate(id, 0);
        id
    }

    /// Replace the text of `id`, bumping its edit counter
    pub fn update_text(
        &mut self,
        id: NodeId,
        text: impl Into<String>,
    ) -> Result<&Node, EditError> {
        let position = self.require(id)?;

        let mut nodes = self.nodes().to_vec();
        nodes[position] = nodes[position].with_text(text.into());
        let len = nodes[position].char_len();

        self.commit(nodes, "update_text");
        self.cursors.clamp(id, len);
        Ok(&self.nodes()[position])
    }

    /// Split `id` at char offset `offset`; returns the new right-hand node
    ///
    /// The left half keeps `id` and its position, the right half is inserted
    /// immediately after it. Focus is left alone: callers acting on Enter
    /// should focus the returned node at offset 0 (as [`Cmd::Split`] does).
    pub fn split(&mut self, id: NodeId, offset: usize) -> Result<Node, EditError> {
        let position = self.require(id)?;

        let (left, right) = split_merge::split(
            &self.history.current().nodes()[position],
            offset,
            &mut self.factory,
        );
        let left_len = left.char_len();

        let mut nodes = self.nodes().to_vec();
        nodes[position] = left;
        nodes.insert(position + 1, right.clone());

        self.commit(nodes, "split");
        self.cursors.clamp(id, left_len);
        Ok(right)
    }

    /// Fold `other` into `current`; returns the merged node
    ///
    /// The merged node keeps `current`'s id and position. The two nodes do not
    /// have to be neighbours.
    pub fn merge(&mut self, current: NodeId, other: NodeId) -> Result<Node, EditError> {
        let current_position = self.require(current)?;
        let other_position = self.require(other)?;
        if current == other {
            return Err(EditError::SelfMerge(current));
        }

        let merged = {
            let nodes = self.nodes();
            split_merge::merge(&nodes[current_position], &nodes[other_position])
        };

        let mut nodes = self.nodes().to_vec();
        nodes[current_position] = merged.clone();
        nodes.remove(other_position);

        self.commit(nodes, "merge");
        self.cursors.remove(other);
        if self.active == Some(other) {
            self.active = Some(current);
        }
        Ok(merged)
    }

    /// Delete `id`; focus falls back to the previous node, else the next one
    pub fn remove(&mut self, id: NodeId) -> Result<Node, EditError> {
        let position = self.require(id)?;

        let mut nodes = self.nodes().to_vec();
        let removed = nodes.remove(position);

        self.commit(nodes, "remove");
        self.cursors.remove(id);

        if self.active == Some(id) {
            self.active = None;
            if let Some(previous) = position.checked_sub(1) {
                let (previous_id, len) = {
                    let node = &self.nodes()[previous];
                    (node.id(), node.char_len())
                };
                self.activate(previous_id, len);
            } else if let Some(next) = self.nodes().first().map(Node::id) {
                self.activate(next, 0);
            }
        }
        Ok(removed)
    }

    // ============ Focus and carets ============

    /// Mark `id` as the single active node, leaving its caret where it was
    pub fn set_active(&mut self, id: NodeId) -> Result<(), EditError> {
        let position = self.require(id)?;
        self.active = Some(id);
        let len = self.nodes()[position].char_len();
        self.cursors.clamp(id, len);
        Ok(())
    }

    /// Record the caret reported by the surface, clamped to the text length
    pub fn set_cursor(&mut self, id: NodeId, offset: usize) -> Result<usize, EditError> {
        let position = self.require(id)?;
        let offset = offset.min(self.nodes()[position].char_len());
        self.cursors.set(id, offset);
        Ok(offset)
    }

    /// Focus `id` with its caret at `offset` (clamped); returns the caret used
    pub fn focus(&mut self, id: NodeId, offset: usize) -> Result<usize, EditError> {
        let offset = self.set_cursor(id, offset)?;
        self.active = Some(id);
        Ok(offset)
    }

    // ============ History ============

    /// Step back one edit; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let before = self.state().clone();
        if !self.history.undo() {
            log::debug!("undo: already at the oldest snapshot");
            return false;
        }
        self.after_history_move(&before, "undo");
        true
    }

    /// Re-apply an undone edit; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let before = self.state().clone();
        if !self.history.redo() {
            log::debug!("redo: already at the newest snapshot");
            return false;
        }
        self.after_history_move(&before, "redo");
        true
    }

    /// Bring focus and carets in line with the state the history now points at
    fn after_history_move(&mut self, before: &DocumentState, reason: &str) {
        self.version += 1;
        let state = self.history.current().clone();

        self.cursors.retain(|id| state.contains(id));
        for node in state.nodes() {
            self.cursors.clamp(node.id(), node.char_len());
        }

        // Focus follows the slot it was in; an emptied-then-restored document
        // takes focus on its first node
        let stale = match self.active {
            Some(active) => !state.contains(active),
            None => !state.is_empty(),
        };
        if stale {
            let former = self
                .active
                .and_then(|active| before.position(active))
                .unwrap_or(0);
            self.active = state
                .nodes()
                .get(former.min(state.len().saturating_sub(1)))
                .map(Node::id);
        }

        log::debug!(
            "{reason}: version {} at history index {} ({} nodes)",
            self.version,
            self.history.index(),
            state.len()
        );
    }

    // ============ Commands ============

    /// Apply a user-level command
    ///
    /// On success the returned [`Patch`] lists what changed and where focus
    /// ended up. On failure nothing changed.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let before = self.state().clone();
        let name = cmd.name();

        let result = self.apply_inner(cmd);
        if let Err(err) = &result {
            log::trace!("{name} refused: {err}");
        }
        result?;

        let (changed, removed) = before.diff(self.state());
        Ok(Patch {
            changed,
            removed,
            focus: self.caret(),
            version: self.version,
        })
    }

    fn apply_inner(&mut self, cmd: Cmd) -> Result<(), EditError> {
        match cmd {
            Cmd::InsertBlank { after } => {
                self.create_blank_at(after);
            }
            Cmd::UpdateText { id, text } => {
                self.update_text(id, text)?;
            }
            Cmd::Split { id, at } => {
                let right = self.split(id, at)?;
                self.activate(right.id(), 0);
            }
            Cmd::MergeWithPrevious { id } => {
                self.require(id)?;
                let previous = self
                    .get_previous(id)
                    .map(|node| (node.id(), node.char_len()));
                let (previous, caret) = previous.ok_or(EditError::NoPrevious(id))?;
                self.merge(previous, id)?;
                self.activate(previous, caret);
            }
            Cmd::MergeWithNext { id } => {
                let position = self.require(id)?;
                let caret = self.nodes()[position].char_len();
                let next = self
                    .get_next(id)
                    .map(Node::id)
                    .ok_or(EditError::NoNext(id))?;
                self.merge(id, next)?;
                self.activate(id, caret);
            }
            Cmd::Merge { into, from } => {
                let position = self.require(into)?;
                let caret = self.nodes()[position].char_len();
                self.merge(into, from)?;
                self.activate(into, caret);
            }
            Cmd::FocusPrevious { id, column } => {
                self.require(id)?;
                let previous = self
                    .get_previous(id)
                    .map(Node::id)
                    .ok_or(EditError::NoPrevious(id))?;
                self.set_cursor(id, column)?;
                self.focus(previous, column)?;
            }
            Cmd::FocusNext { id, column } => {
                self.require(id)?;
                let next = self
                    .get_next(id)
                    .map(Node::id)
                    .ok_or(EditError::NoNext(id))?;
                self.set_cursor(id, column)?;
                self.focus(next, column)?;
            }
            Cmd::Focus { id, at } => {
                self.focus(id, at)?;
            }
            Cmd::Remove { id } => {
                self.remove(id)?;
            }
            Cmd::Undo => {
                self.undo();
            }
            Cmd::Redo => {
                self.redo();
            }
        }
        Ok(())
    }

    // ============ Internals ============

    fn require(&self, id: NodeId) -> Result<usize, EditError> {
        self.state()
            .position(id)
            .ok_or(EditError::NodeNotFound(id))
    }

    fn activate(&mut self, id: NodeId, offset: usize) {
        self.active = Some(id);
        self.cursors.set(id, offset);
    }

    fn commit(&mut self, nodes: Vec<Node>, reason: &str) {
        self.history.commit(DocumentState::from_nodes(nodes));
        self.version += 1;
        log::debug!(
            "{reason}: version {} ({} nodes, {} snapshots)",
            self.version,
            self.len(),
            self.history.len()
        );
    }
}
