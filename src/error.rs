//! Error types for editor operations.

use thiserror::Error;

/// Errors that can occur while configuring or driving the editor.
///
/// Rejected gestures (a closure click too far from the first vertex, an arrow
/// shorter than the minimum length) and stale events are not errors; the editor
/// ignores them and returns `Ok`.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The editor has no view bound (before `mount` or after `unmount`)
    #[error("Editor is not mounted to a view")]
    NotMounted,

    /// Configuration values are out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error
        message: String,
    },

    /// Fractional coordinates were supplied before the surface size is known
    #[error("Surface size unknown, cannot convert fractional coordinates")]
    UnknownSurface,

    /// An externally supplied group is malformed
    #[error("Malformed group at index {index}: {message}")]
    MalformedGroup {
        /// Position of the offending group in the supplied list
        index: usize,
        /// Description of the problem
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while loading configuration or scripts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create an invalid configuration error with a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a malformed group error.
    pub fn malformed_group(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedGroup {
            index,
            message: message.into(),
        }
    }
}
