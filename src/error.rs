//! Error handling module for the GPU wizard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Domain failures reported by detection/installation collaborators travel as
//! opaque [`SharedError`] values inside messages; everything else uses
//! [`WizardError`].

use std::sync::Arc;
use thiserror::Error;

/// Opaque domain error carried by `NavigateToError` and friends.
///
/// `Arc` keeps messages cheap to clone into commands.
pub type SharedError = Arc<anyhow::Error>;

/// Wrap any error into a [`SharedError`]
pub fn shared(err: impl Into<anyhow::Error>) -> SharedError {
    Arc::new(err.into())
}

/// Wrap a plain message into a [`SharedError`]
pub fn shared_msg(msg: impl Into<String>) -> SharedError {
    Arc::new(anyhow::Error::msg(msg.into()))
}

/// Main error type for the GPU wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// IO errors (terminal, log file, profile loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (CLI values, profile contents)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Runtime errors (message queue closed, command thread failure)
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The cancellation signal fired before the work completed
    #[error("Operation cancelled")]
    Cancelled,

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a runtime error
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
