//! Custom error types for Laverna
//!
//! This module provides a unified error type that can be used throughout
//! the application and is compatible with Tauri's command error handling.

use thiserror::Error;

/// Main error type for Laverna operations
#[derive(Error, Debug)]
pub enum LavernaError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors raised by the Tauri runtime
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    /// Failures handing a URL to the system's default handler
    #[error("Opener error: {0}")]
    Opener(#[from] tauri_plugin_opener::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation needed the main window before `create_main` ran
    #[error("Main window has not been created")]
    WindowNotCreated,

    /// `create_main` was called while a main window is live
    #[error("Main window already exists")]
    WindowAlreadyCreated,

    /// The main window was released on quit and cannot be used again
    #[error("Main window has been released")]
    WindowReleased,

    /// Mutex lock errors
    #[error("Lock error: {0}")]
    Lock(String),

    /// General errors with a message
    #[error("{0}")]
    General(String),
}

impl LavernaError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a lock error
    pub fn lock(msg: impl Into<String>) -> Self {
        Self::Lock(msg.into())
    }
}

/// Convert LavernaError to String for Tauri command compatibility
impl From<LavernaError> for String {
    fn from(err: LavernaError) -> Self {
        err.to_string()
    }
}

/// Convert String errors to LavernaError
impl From<String> for LavernaError {
    fn from(s: String) -> Self {
        Self::General(s)
    }
}

/// Convert &str errors to LavernaError
impl From<&str> for LavernaError {
    fn from(s: &str) -> Self {
        Self::General(s.to_string())
    }
}

/// Result type alias using LavernaError
pub type Result<T> = std::result::Result<T, LavernaError>;

/// Serialize LavernaError for Tauri
impl serde::Serialize for LavernaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
