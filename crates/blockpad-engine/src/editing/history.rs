/// Linear undo/redo over full snapshots
///
/// Holds every committed state plus an index pointing at the current one.
/// Committing after an undo discards the redo tail; there is no branching.
/// With a limit set, the oldest snapshots are dropped once the log grows past
/// it, so undo stops earlier but the current state is always kept.
#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    entries: Vec<T>,
    index: usize,
    limit: Option<usize>,
}

impl<T> HistoryLog<T> {
    /// Start a log whose only entry is `initial`
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: None,
        }
    }

    /// Start a log that keeps at most `limit` snapshots (at least one)
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new(initial)
        }
    }

    /// The state the index currently points at
    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    /// Record `state` as the new current state
    pub fn commit(&mut self, state: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index = self.entries.len() - 1;

        if let Some(limit) = self.limit
            && self.entries.len() > limit
        {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
            self.index -= excess;
        }
    }

    /// Step back one snapshot; returns false when already at the oldest
    pub fn undo(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one snapshot; returns false when already at the newest
    pub fn redo(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of stored snapshots, including the current one
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn log_with(states: &[&'static str]) -> HistoryLog<&'static str> {
        let mut log = HistoryLog::new("E0");
        for state in states {
            log.commit(*state);
        }
        log
    }

    #[test]
    fn test_new_log_has_single_entry() {
        let log = HistoryLog::new(0);
        assert_eq!(*log.current(), 0);
        assert_eq!(log.len(), 1);
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn test_commit_advances_index() {
        let log = log_with(&["E1", "E2"]);
        assert_eq!(*log.current(), "E2");
        assert_eq!(log.index(), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_undo_clamps_at_oldest() {
        let mut log = log_with(&["E1"]);

        assert!(log.undo());
        assert_eq!(*log.current(), "E0");
        assert!(!log.undo());
        assert_eq!(*log.current(), "E0");
    }

    #[test]
    fn test_redo_clamps_at_newest() {
        let mut log = log_with(&["E1"]);

        assert!(!log.redo());
        log.undo();
        assert!(log.redo());
        assert_eq!(*log.current(), "E1");
        assert!(!log.redo());
    }

    #[test]
    fn test_commit_after_undo_discards_redo_tail() {
        let mut log = log_with(&["E1", "E2", "E3"]);

        log.undo();
        log.undo();
        assert_eq!(*log.current(), "E1");

        log.commit("E4");
        assert_eq!(*log.current(), "E4");
        assert!(!log.can_redo());
        assert!(!log.redo());

        log.undo();
        assert_eq!(*log.current(), "E1");
        log.undo();
        assert_eq!(*log.current(), "E0");
    }

    #[test]
    fn test_limit_drops_oldest_snapshots() {
        let mut log = HistoryLog::with_limit("E0", 3);
        for state in ["E1", "E2", "E3", "E4"] {
            log.commit(state);
        }

        assert_eq!(log.len(), 3);
        assert_eq!(*log.current(), "E4");

        assert!(log.undo());
        assert!(log.undo());
        assert_eq!(*log.current(), "E2");
        assert!(!log.undo());
    }

    #[test]
    fn test_limit_of_zero_keeps_current_state() {
        let mut log = HistoryLog::with_limit(1, 0);
        log.commit(2);

        assert_eq!(log.limit(), Some(1));
        assert_eq!(*log.current(), 2);
        assert!(!log.can_undo());
    }
}
