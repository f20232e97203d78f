//! # UI Error Types
//!
//! Recoverable failures: bad configuration and window lookups through the
//! fallible API. Misuse inside a frame (nested splits, stack underflow) is
//! a panic, not an error.

use thiserror::Error;

use crate::window::WindowId;

/// Errors that can occur outside the per-frame hot path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// No window with this id exists.
    #[error("unknown window: {0}")]
    UnknownWindow(WindowId),

    /// A window with this name already exists.
    #[error("window already exists: {0}")]
    DuplicateWindow(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
