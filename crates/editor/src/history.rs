//! Generic linear undo/redo history.
//!
//! A `ChangeHistory` stores an ordered list of states with a cursor on the
//! current one. Adding a state discards everything after the cursor, so the
//! history is always a single line, never a tree. The history itself never
//! applies a state; `undo`/`redo` move the cursor and hand the new current
//! state back to the caller to enact.

/// Linear state history with a cursor.
///
/// Empty history has no cursor. Once a state is added the cursor always
/// points at a valid entry.
#[derive(Debug)]
pub struct ChangeHistory<T: Clone> {
    states: Vec<T>,
    /// Index of the current state. `None` only while `states` is empty.
    cursor: Option<usize>,
}

impl<T: Clone> Default for ChangeHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ChangeHistory<T> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            cursor: None,
        }
    }

    /// Record a new state as the current one. Any redo tail beyond the old
    /// cursor is discarded first.
    pub fn add_state(&mut self, state: T) {
        if let Some(cursor) = self.cursor {
            self.states.truncate(cursor + 1);
        }
        self.states.push(state);
        self.cursor = Some(self.states.len() - 1);
    }

    /// True when a state exists before the cursor.
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    /// True when a state exists after the cursor.
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.states.len())
    }

    /// Step the cursor back and return the new current state for the caller
    /// to enact. Calling this when `can_undo()` is false is a logic error.
    pub fn undo(&mut self) -> T {
        assert!(self.can_undo(), "undo called with nothing to undo");
        let cursor = self.cursor.unwrap() - 1;
        self.cursor = Some(cursor);
        self.states[cursor].clone()
    }

    /// Step the cursor forward and return the new current state for the
    /// caller to enact. Calling this when `can_redo()` is false is a logic
    /// error.
    pub fn redo(&mut self) -> T {
        assert!(self.can_redo(), "redo called with nothing to redo");
        let cursor = self.cursor.unwrap() + 1;
        self.cursor = Some(cursor);
        self.states[cursor].clone()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the current state, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.map(|c| &self.states[c])
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.cursor = None;
    }

    /// Visit every stored state in order, oldest first.
    pub fn for_each_state(&self, mut f: impl FnMut(&T)) {
        for state in &self.states {
            f(state);
        }
    }
}
