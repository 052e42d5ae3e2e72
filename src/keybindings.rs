//! Customizable keybindings for the polygon editor.
//!
//! Keys are matched by their name as delivered by the host (`"d"`, `"Delete"`,
//! `"Escape"`, ...). Single-character names match case-insensitively.

use serde::{Deserialize, Serialize};

/// Editor functions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKey {
    /// Held: clicking a vertex deletes it. Pressed while drawing: drop the last vertex.
    DeleteVertex,
    /// Held: clicking an edge handle toggles it between straight and curved.
    Curve,
    /// Delete the selected label.
    DeleteLabel,
    /// Discard the polygon being drawn.
    CancelDrawing,
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_delete_vertex")]
    pub delete_vertex: String,
    #[serde(default = "default_curve")]
    pub curve: String,
    #[serde(default = "default_delete_label")]
    pub delete_label: Vec<String>,
    #[serde(default = "default_cancel")]
    pub cancel_drawing: String,
}

fn default_delete_vertex() -> String {
    "d".to_string()
}

fn default_curve() -> String {
    "c".to_string()
}

fn default_delete_label() -> Vec<String> {
    vec!["Delete".to_string(), "Backspace".to_string()]
}

fn default_cancel() -> String {
    "Escape".to_string()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            delete_vertex: default_delete_vertex(),
            curve: default_curve(),
            delete_label: default_delete_label(),
            cancel_drawing: default_cancel(),
        }
    }
}

fn key_matches(binding: &str, key: &str) -> bool {
    if binding.chars().count() == 1 {
        binding.eq_ignore_ascii_case(key)
    } else {
        binding == key
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the editor function bound to a key, if any.
    pub fn editor_key(&self, key: &str) -> Option<EditorKey> {
        if key_matches(&self.delete_vertex, key) {
            Some(EditorKey::DeleteVertex)
        } else if key_matches(&self.curve, key) {
            Some(EditorKey::Curve)
        } else if self.delete_label.iter().any(|b| key_matches(b, key)) {
            Some(EditorKey::DeleteLabel)
        } else if key_matches(&self.cancel_drawing, key) {
            Some(EditorKey::CancelDrawing)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.editor_key("d"), Some(EditorKey::DeleteVertex));
        assert_eq!(bindings.editor_key("D"), Some(EditorKey::DeleteVertex));
        assert_eq!(bindings.editor_key("c"), Some(EditorKey::Curve));
        assert_eq!(bindings.editor_key("Backspace"), Some(EditorKey::DeleteLabel));
        assert_eq!(bindings.editor_key("Escape"), Some(EditorKey::CancelDrawing));
        assert_eq!(bindings.editor_key("x"), None);
    }

    #[test]
    fn test_multi_char_names_are_exact() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.editor_key("delete"), None);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let bindings: KeyBindings = serde_json::from_str(r#"{"curve": "b"}"#).unwrap();
        assert_eq!(bindings.editor_key("b"), Some(EditorKey::Curve));
        assert_eq!(bindings.editor_key("c"), None);
        assert_eq!(bindings.editor_key("d"), Some(EditorKey::DeleteVertex));
    }
}
