//! Configuration file support for the polygon editor.
//!
//! Editor policy (closing, hit testing, validity thresholds), keybindings and
//! log verbosity are read from and written to JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AREA_PRODUCT_CLOSE_THRESHOLD, DEFAULT_CLOSE_RADIUS, DEFAULT_HIT_RADIUS, DEFAULT_MAX_HISTORY,
    DEFAULT_MIN_AREA,
};
use crate::geometry::{IntersectionTest, Vector2D};
use crate::keybindings::KeyBindings;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// When a release near the first vertex closes a polygon being drawn.
///
/// Every policy also closes on a release over the first vertex's handle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Only a release on the first vertex handle closes. This is the default;
    /// `{"kind": "area_product", "threshold": 10.0}` as the editor's
    /// `close_policy` restores the legacy heuristic.
    #[default]
    HandleHit,
    /// Close when `|dx| * |dy|` to the first vertex is below `threshold`.
    ///
    /// This is the legacy heuristic. It is asymmetric: a release far away
    /// along one axis but aligned on the other closes the polygon.
    AreaProduct { threshold: f64 },
    /// Close when the release is within `radius` of the first vertex.
    Distance { radius: f64 },
}

impl ClosePolicy {
    pub fn area_product() -> Self {
        ClosePolicy::AreaProduct {
            threshold: AREA_PRODUCT_CLOSE_THRESHOLD,
        }
    }

    pub fn distance() -> Self {
        ClosePolicy::Distance {
            radius: DEFAULT_CLOSE_RADIUS,
        }
    }

    /// Decide whether a release at `release` closes a polygon starting at `first`.
    pub fn should_close(&self, first: Vector2D, release: Vector2D, on_first_handle: bool) -> bool {
        if on_first_handle {
            return true;
        }
        match *self {
            ClosePolicy::HandleHit => false,
            ClosePolicy::AreaProduct { threshold } => {
                (release.x - first.x).abs() * (release.y - first.y).abs() < threshold
            }
            ClosePolicy::Distance { radius } => first.distance_to(&release) <= radius,
        }
    }
}

/// Interactive editing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub close_policy: ClosePolicy,
    /// Radius within which a pointer hits a path point handle
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f64,
    /// Minimum vertex-chord area of a committed polygon
    #[serde(default = "default_min_area")]
    pub min_area: f64,
    #[serde(default)]
    pub intersection_test: IntersectionTest,
}

fn default_hit_radius() -> f64 {
    DEFAULT_HIT_RADIUS
}

fn default_min_area() -> f64 {
    DEFAULT_MIN_AREA
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            close_policy: ClosePolicy::default(),
            hit_radius: default_hit_radius(),
            min_area: default_min_area(),
            intersection_test: IntersectionTest::default(),
        }
    }
}

impl EditorConfig {
    pub fn with_close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    pub fn with_intersection_test(mut self, test: IntersectionTest) -> Self {
        self.intersection_test = test;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Maximum number of undo steps
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            editor: EditorConfig::default(),
            keybindings: KeyBindings::default(),
            max_history: default_max_history(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories if needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let mut config = AppConfig::new();
        config.editor.close_policy = ClosePolicy::Distance { radius: 4.0 };
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_version_too_new() {
        let json = r#"{"version": 99}"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.max_history, DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn test_close_policy_json() {
        let editor: EditorConfig =
            serde_json::from_str(r#"{"close_policy": {"kind": "area_product", "threshold": 10.0}}"#)
                .unwrap();
        assert_eq!(editor.close_policy, ClosePolicy::area_product());
        assert_eq!(editor.hit_radius, DEFAULT_HIT_RADIUS);
    }

    #[test]
    fn test_handle_hit_policy() {
        let first = Vector2D::new(1.0, 1.0);
        let policy = ClosePolicy::HandleHit;
        assert!(policy.should_close(first, Vector2D::new(50.0, 50.0), true));
        assert!(!policy.should_close(first, Vector2D::new(1.0, 1.0), false));
    }

    #[test]
    fn test_area_product_is_asymmetric() {
        let first = Vector2D::new(0.0, 0.0);
        let policy = ClosePolicy::area_product();
        // Far away but axis-aligned: product is zero
        assert!(policy.should_close(first, Vector2D::new(100.0, 0.0), false));
        assert!(!policy.should_close(first, Vector2D::new(4.0, 4.0), false));
    }

    #[test]
    fn test_distance_policy() {
        let first = Vector2D::new(0.0, 0.0);
        let policy = ClosePolicy::Distance { radius: 5.0 };
        assert!(policy.should_close(first, Vector2D::new(3.0, 4.0), false));
        assert!(!policy.should_close(first, Vector2D::new(100.0, 0.0), false));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("polyedit-config-{}", std::process::id()));
        let path = dir.join("config.json");
        let config = AppConfig::new();
        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
