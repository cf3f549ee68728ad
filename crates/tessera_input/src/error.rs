//! Input error types

use tessera_core::react::{BoxError, ReactError};
use thiserror::Error;

/// Errors returned by providers and interactions
///
/// The interaction manager logs these and carries on; they never reach the
/// code that fed the input event in.
#[derive(Error, Debug)]
pub enum InputError {
    /// A handler rejected the event
    #[error("handler failed: {0}")]
    Handler(String),

    /// A reactive update made by a handler failed
    #[error("reactive update failed: {0}")]
    Reactive(#[from] ReactError),

    /// Any other handler error
    #[error("{0}")]
    Other(BoxError),
}

impl InputError {
    pub fn handler(message: impl Into<String>) -> Self {
        InputError::Handler(message.into())
    }
}

/// Result type for handler callbacks
pub type Result<T> = std::result::Result<T, InputError>;
