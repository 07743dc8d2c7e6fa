//! Undo/redo stacks of full state snapshots.

use super::{
    assignment::Assignment,
    trail::{Decision, Trail},
};

/// Assignment, decision map, and UNSAT verdict at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) assignment: Assignment,
    pub(crate) trail: Trail,
    pub(crate) unsat: bool,
    pub(crate) sentinel: Option<Decision>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    /// Records the state before a new decision; the redo stack is dropped.
    pub(crate) fn push(&mut self, snapshot: Snapshot) {
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Swaps `current` for the last recorded state.
    pub(crate) fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Swaps `current` for the most recently undone state.
    pub(crate) fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Var;

    fn snapshot(assigned: &[bool]) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.assignment.set_var_count(assigned.len());
        for (idx, &value) in assigned.iter().enumerate() {
            snapshot.assignment.assign(Var::from_index(u32::try_from(idx).unwrap()).lit(value));
        }
        snapshot
    }

    #[test]
    fn undo_redo() {
        let mut history = History::default();
        assert!(history.undo(snapshot(&[])).is_none());
        history.push(snapshot(&[]));
        history.push(snapshot(&[true]));
        let current = snapshot(&[true, false]);

        let previous = history.undo(current.clone()).unwrap();
        assert_eq!(previous, snapshot(&[true]));
        assert!(history.can_redo());
        let next = history.redo(previous).unwrap();
        assert_eq!(next, current);
        assert!(!history.can_redo());
    }

    #[test]
    fn push_clears_redo() {
        let mut history = History::default();
        history.push(snapshot(&[]));
        let _ = history.undo(snapshot(&[true]));
        assert!(history.can_redo());
        history.push(snapshot(&[]));
        assert!(!history.can_redo());
        assert!(history.can_undo());
        history.clear();
        assert!(!history.can_undo());
    }
}
