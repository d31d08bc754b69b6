//! Snapshot-based undo/redo over the scene's element list.
//!
//! Each entry is a deep copy of the whole list taken just before a mutating
//! gesture. History is local to one client and is never synchronized, so two
//! collaborators can hold completely different stacks for the same board.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::doc::{Element, Scene};

/// Bounded undo stack plus an unbounded redo stack.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Vec<Element>>,
    redo: Vec<Vec<Element>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo snapshots.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), limit: limit.max(1) }
    }

    /// Snapshot `scene` onto the undo stack and clear the redo stack.
    ///
    /// When the stack is full the oldest snapshot is dropped.
    pub fn push(&mut self, scene: &Scene) {
        self.undo.push_back(scene.snapshot());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back. Returns the list to install, or `None` at the boundary.
    ///
    /// `current` is saved on the redo stack so [`History::redo`] can return to it.
    pub fn undo(&mut self, current: &[Element]) -> Option<Vec<Element>> {
        let snapshot = self.undo.pop_back()?;
        self.redo.push(current.to_vec());
        Some(snapshot)
    }

    /// Step forward. Mirror of [`History::undo`].
    pub fn redo(&mut self, current: &[Element]) -> Option<Vec<Element>> {
        let snapshot = self.redo.pop()?;
        self.undo.push_back(current.to_vec());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(snapshot)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo snapshots held.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo snapshots held.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
