//! Bounded snapshot log for single-level rollback
//!
//! The stack is process-wide, not per-field: each entry names the field it
//! belongs to and carries a full fragment snapshot plus the cursor's text
//! offset. Undo pops the top entry and restores that field exactly. There
//! is no redo; a popped entry is gone.

use serde::{Deserialize, Serialize};

/// Default capacity of the process-wide stack.
pub const UNDO_CAPACITY: usize = 50;

/// One snapshot taken before a mutating command ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoEntry {
    /// Identifier of the owning field.
    pub field: String,
    /// Full fragment markup before the mutation.
    pub fragment: String,
    /// Cursor text offset before the mutation (clamped on restore if stale).
    pub cursor: usize,
}

/// Bounded LIFO of fragment snapshots.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY)
    }
}

impl UndoStack {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Push a snapshot, unless it would duplicate the top entry for the
    /// same field with identical markup. The oldest entry falls off once
    /// the stack is full.
    pub fn push(&mut self, entry: UndoEntry) {
        if let Some(top) = self.entries.last() {
            if top.field == entry.field && top.fragment == entry.fragment {
                return;
            }
        }
        self.entries.push(entry);
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
