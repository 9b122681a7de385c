//! Error types shared by the extension framework and its backends

use thiserror::Error;

/// Errors that can occur while wiring extensions to their backends
///
/// A missing value is never an error: producers and extensions report
/// absence as `None`.
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// A plugin was delivered whose concrete type is not the one the
    /// listener registered for
    #[error("Plugin for action '{action}' is not a {expected}")]
    PluginTypeMismatch {
        action: String,
        expected: &'static str,
    },

    /// Tried to remove a listener that was never added (or already removed)
    #[error("Listener not subscribed: {0}")]
    NotSubscribed(String),

    /// The backend refused or could not take the subscription
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// IO error while reading or writing a settings file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed or serialized
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ExtensionError {
    /// Create a plugin type mismatch error
    pub fn plugin_type_mismatch(action: impl Into<String>, expected: &'static str) -> Self {
        Self::PluginTypeMismatch {
            action: action.into(),
            expected,
        }
    }

    /// Create a not-subscribed error for the given backend
    pub fn not_subscribed(backend: impl Into<String>) -> Self {
        Self::NotSubscribed(backend.into())
    }
}

pub type ExtensionResult<T> = Result<T, ExtensionError>;
