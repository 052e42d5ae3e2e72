//! Undo/redo over document versions.
//!
//! Every recorded entry holds the version before and after an action. Since
//! versions share structure, keeping many of them costs little more than the
//! items each action actually touched.

use std::sync::Arc;

use super::state::State;
use crate::constants::DEFAULT_MAX_HISTORY;

/// A recorded transition between two document versions.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Description of the action that produced `after`
    pub description: String,
    pub before: Arc<State>,
    pub after: Arc<State>,
}

/// Configuration for the history
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of entries to keep
    pub max_history: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Undo and redo stacks of document versions (most recent at the end).
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    config: HistoryConfig,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Record a transition. This clears the redo stack.
    pub fn push(&mut self, entry: HistoryEntry) {
        log::debug!("📝 History: pushed '{}'", entry.description);
        self.undo_stack.push(entry);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.config.max_history {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Move the latest entry to the redo stack and return it.
    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        log::debug!("⏪ Undo: '{}'", entry.description);
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Move the latest undone entry back to the undo stack and return it.
    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        log::debug!("⏩ Redo: '{}'", entry.description);
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ History cleared");
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
