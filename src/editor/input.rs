//! Input state shared by the editors.

use std::collections::HashSet;

use crate::keybindings::EditorKey;

/// Editor keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<EditorKey>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: EditorKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: EditorKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: EditorKey) -> bool {
        self.held.contains(&key)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// What the pointer is over: a label (by list index) and one of its handles.
///
/// Handle `0` is the whole shape; handle `h > 0` is the label's point `h - 1`.
/// Hosts that render control colors obtain this by decoding the pixel under
/// the pointer with [`crate::color_utils::decode_control_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub label: usize,
    pub handle: usize,
}

impl Pick {
    pub fn new(label: usize, handle: usize) -> Self {
        Self { label, handle }
    }

    /// Decode a pick from a control color.
    pub fn from_control_color(color: [u8; 3]) -> Option<Self> {
        crate::color_utils::decode_control_color(color).map(|(label, handle)| Self::new(label, handle))
    }
}
