//! Scripted event replay.
//!
//! A [`ReplayScript`] names a task, its item urls and a list of input events.
//! [`replay`] feeds the events through a [`Label2dList`] over a fresh
//! [`Store`] and returns the list, whose store holds the resulting document.
//!
//! ```json
//! {
//!   "task": { "project_name": "demo", "categories": ["car"] },
//!   "items": ["a.jpg"],
//!   "events": [
//!     { "type": "down", "x": 1, "y": 1 },
//!     { "type": "up", "x": 1, "y": 1 },
//!     { "type": "key_down", "key": "Escape" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::editor::{EditError, Label2dList, Pick};
use crate::geometry::Vector2D;
use crate::model::ItemIndex;
use crate::store::action::go_to_item;
use crate::store::{HistoryConfig, State, Store, TaskConfig};

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),

    /// An event was rejected by the editor
    #[error("Event {index} failed: {source}")]
    Event {
        index: usize,
        #[source]
        source: EditError,
    },
}

/// One input event. Pointer events may carry an explicit pick as
/// `[label, handle]`; without one the list hit-tests the coordinate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        pick: Option<(usize, usize)>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        pick: Option<(usize, usize)>,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        pick: Option<(usize, usize)>,
    },
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    GoToItem {
        item: ItemIndex,
    },
    Undo,
    Redo,
}

/// A task, its items and the events to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub task: TaskConfig,
    pub items: Vec<String>,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json(&json)?;
        log::info!(
            "📜 Loaded script from {:?}: {} items, {} events",
            path,
            script.items.len(),
            script.events.len()
        );
        Ok(script)
    }

    /// A fresh store holding one empty item per url.
    pub fn new_store(&self, config: &AppConfig) -> Store {
        let urls: Vec<&str> = self.items.iter().map(String::as_str).collect();
        Store::new(State::new(self.task.clone(), &urls)).with_history_config(HistoryConfig {
            max_history: config.max_history,
        })
    }
}

/// Replay every event of `script` and return the list with its store.
pub fn replay(script: &ReplayScript, config: &AppConfig) -> Result<Label2dList<Store>, ReplayError> {
    let mut list = Label2dList::new(
        script.new_store(config),
        config.editor,
        config.keybindings.clone(),
    );
    for (index, event) in script.events.iter().enumerate() {
        log::trace!("Event {}: {:?}", index, event);
        apply_event(&mut list, event).map_err(|source| ReplayError::Event { index, source })?;
    }
    log::info!(
        "Replayed {} events, {} labels on item {}",
        script.events.len(),
        list.labels().len(),
        list.item()
    );
    Ok(list)
}

fn apply_event(list: &mut Label2dList<Store>, event: &ReplayEvent) -> Result<(), EditError> {
    match event {
        ReplayEvent::Down { x, y, pick } => match pick {
            Some(pick) => list.pointer_down_with(Vector2D::new(*x, *y), Some(to_pick(*pick))),
            None => list.pointer_down(Vector2D::new(*x, *y)),
        },
        ReplayEvent::Move { x, y, pick } => match pick {
            Some(pick) => list.pointer_move_with(Vector2D::new(*x, *y), Some(to_pick(*pick))),
            None => list.pointer_move(Vector2D::new(*x, *y)),
        },
        ReplayEvent::Up { x, y, pick } => match pick {
            Some(pick) => list.pointer_up_with(Vector2D::new(*x, *y), Some(to_pick(*pick))),
            None => list.pointer_up(Vector2D::new(*x, *y)),
        },
        ReplayEvent::KeyDown { key } => list.key_down(key),
        ReplayEvent::KeyUp { key } => {
            list.key_up(key);
            Ok(())
        }
        ReplayEvent::GoToItem { item } => list.dispatch(go_to_item(*item)),
        ReplayEvent::Undo => {
            if list.store_mut().undo() {
                list.sync();
            }
            Ok(())
        }
        ReplayEvent::Redo => {
            if list.store_mut().redo() {
                list.sync();
            }
            Ok(())
        }
    }
}

fn to_pick((label, handle): (usize, usize)) -> Pick {
    Pick::new(label, handle)
}
