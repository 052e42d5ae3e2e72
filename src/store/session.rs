//! The document store: single dispatch point for all edits.

use std::fmt;
use std::sync::Arc;

use super::action::Action;
use super::error::StoreError;
use super::history::{History, HistoryConfig, HistoryEntry};
use super::reducer::reduce;
use super::state::State;

/// Handle through which editors read the document and submit actions.
pub trait Dispatcher {
    /// Current document version.
    fn state(&self) -> Arc<State>;

    /// Reduce an action into a new version and make it current.
    fn dispatch(&mut self, action: Action) -> Result<Arc<State>, StoreError>;
}

/// Callback invoked with every new document version.
pub type Subscriber = Box<dyn FnMut(&Arc<State>) + Send>;

/// Holds the current document version, its history and subscribers.
pub struct Store {
    state: Arc<State>,
    /// Incremented on every change of the current version
    version: u64,
    history: History,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.version)
            .field("undo_count", &self.history.undo_count())
            .field("redo_count", &self.history.redo_count())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl Store {
    pub fn new(state: State) -> Self {
        Self {
            state: Arc::new(state),
            version: 0,
            history: History::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn with_history_config(mut self, config: HistoryConfig) -> Self {
        self.history = History::with_config(config);
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Register a callback for new versions.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    fn publish(&mut self, state: Arc<State>) {
        self.state = state;
        self.version += 1;
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
    }

    /// Restore the version before the last recorded action, keeping the
    /// current selection. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        let mut restored = entry.before.as_ref().clone();
        self.carry_selection(&mut restored);
        self.publish(Arc::new(restored));
        true
    }

    /// Re-apply the last undone action. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        let mut restored = entry.after.as_ref().clone();
        self.carry_selection(&mut restored);
        self.publish(Arc::new(restored));
        true
    }

    /// Copy the current selection onto `restored`, dropping labels it lacks.
    fn carry_selection(&self, restored: &mut State) {
        let mut select = self.state.select.clone();
        for (item, ids) in select.labels.iter_mut() {
            ids.retain(|id| restored.label(*item, *id).is_some());
        }
        select.labels.retain(|_, ids| !ids.is_empty());
        restored.select = select;
    }
}

impl Dispatcher for Store {
    fn state(&self) -> Arc<State> {
        Arc::clone(&self.state)
    }

    fn dispatch(&mut self, action: Action) -> Result<Arc<State>, StoreError> {
        let next = match reduce(&self.state, &action) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                log::error!("❌ Rejected '{}': {}", action.description(), e);
                return Err(e);
            }
        };
        if action.is_undoable() {
            self.history.push(HistoryEntry {
                description: action.description(),
                before: Arc::clone(&self.state),
                after: Arc::clone(&next),
            });
        }
        self.publish(Arc::clone(&next));
        Ok(next)
    }
}
