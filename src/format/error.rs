//! Error types for interchange format operations.

use thiserror::Error;

/// Errors that can occur while reading or writing interchange files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Category name not defined by the task configuration
    #[error("Unknown category '{name}'")]
    UnknownCategory {
        /// The category name found in the file
        name: String,
    },

    /// Attribute name not defined by the task configuration
    #[error("Unknown attribute '{name}'")]
    UnknownAttribute {
        /// The attribute name found in the file
        name: String,
    },

    /// Shape kind not supported by this crate
    #[error("Unsupported shape type '{shape}' for format '{format}'")]
    UnsupportedShape {
        /// The shape type that was encountered
        shape: String,
        /// The format that doesn't support this shape
        format: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an unsupported shape error.
    pub fn unsupported_shape(shape: impl Into<String>, format: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            shape: shape.into(),
            format: format.into(),
        }
    }
}
