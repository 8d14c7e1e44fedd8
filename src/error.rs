//! Error types for the tokio-emitter library.

use crate::event::Arg;
use thiserror::Error;
use uuid::Uuid;

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tokio-emitter
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A topic pattern uses `#` somewhere other than its final position
    #[error("Invalid topic pattern '{pattern}': '#' must be the final segment")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
    },

    /// An `error` event was emitted with an argument and nothing handled it.
    ///
    /// The first argument of the emission is carried as the fault value.
    #[error("Uncaught 'error' event: {0}")]
    Uncaught(Arg),

    /// An `error` event was emitted without arguments and nothing handled it
    #[error("Uncaught, unspecified 'error' event")]
    UnhandledError,

    /// The listener is not registered for the event
    #[error("Listener {listener} is not registered for '{event}'")]
    ListenerNotFound {
        /// Event name the removal was attempted on
        event: String,
        /// ID of the listener that was not found
        listener: Uuid,
    },

    /// Event handler error
    #[error("Handler error: {0}")]
    Handler(String),

    /// A scheduled pending computation panicked or was cancelled
    #[error("Scheduled task failed: {0}")]
    TaskFailed(String),

    /// No tokio runtime is available to schedule a pending computation
    #[error("No tokio runtime available to schedule a pending computation")]
    NoRuntime,

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Create a new handler error
    pub fn handler(msg: impl Into<String>) -> Self {
        Error::Handler(msg.into())
    }

    /// Check if this error comes from an unhandled `error` event
    pub fn is_uncaught(&self) -> bool {
        matches!(self, Error::Uncaught(_) | Error::UnhandledError)
    }

    /// Check if this is a topic grammar error
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, Error::InvalidPattern { .. })
    }

    /// The argument an unhandled `error` emission was raised with, if any
    pub fn payload(&self) -> Option<&Arg> {
        match self {
            Error::Uncaught(arg) => Some(arg),
            _ => None,
        }
    }

    /// Unwrap a crate error carried as the payload of an uncaught `error` event.
    ///
    /// Returns `self` when there is no such nested error.
    pub fn into_source_error(self) -> Error {
        match self.payload().and_then(Arg::as_error) {
            Some(inner) => inner.clone(),
            None => self,
        }
    }
}
