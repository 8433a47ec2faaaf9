use std::collections::VecDeque;
use std::sync::Arc;

use crate::editing::Selection;
use crate::models::Document;

/// A document version that undo or redo can return to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub doc: Arc<Document>,
    pub selection: Selection,
}

/// Undo and redo stacks of whole-document snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    /// 0 = unlimited
    depth: usize,
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Record the state a new commit is leaving. Clears the redo stack.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.push_undo(entry);
    }

    /// Swap `current` for the most recent undo entry.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.undo.pop_back()?;
        self.redo.push(current);
        Some(entry)
    }

    /// Swap `current` for the most recent redo entry.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.push_undo(current);
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo.push_back(entry);
        if self.depth > 0 {
            while self.undo.len() > self.depth {
                self.undo.pop_front();
            }
        }
    }
}
