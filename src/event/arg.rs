//! Type-erased emission arguments.

use crate::listener::Listener;
use crate::Error;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A single positional argument passed to listeners by `emit`.
///
/// Arguments are reference counted, so cloning one for every listener (and
/// for the event name injected into pattern listeners) does not copy the
/// payload.
#[derive(Clone)]
pub struct Arg {
    /// The type-erased payload
    payload: Arc<dyn Any + Send + Sync>,

    /// Human-readable type name for debugging
    type_name: &'static str,
}

impl Arg {
    /// Wrap a value as an emission argument
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            payload: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Get the type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if this argument holds a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Try to downcast to a specific type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Borrow the argument as a string, if it holds a `String` or `&'static str`
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| self.downcast_ref::<&'static str>().copied())
    }

    /// Borrow the argument as a crate error
    pub fn as_error(&self) -> Option<&Error> {
        self.downcast_ref::<Error>()
    }

    /// Borrow the argument as a listener (as passed to `new_listener`)
    pub fn as_listener(&self) -> Option<&Listener> {
        self.downcast_ref::<Listener>()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = self.as_error() {
            write!(f, "{}", err)
        } else if let Some(s) = self.as_str() {
            f.write_str(s)
        } else {
            write!(f, "<{}>", self.type_name)
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::new(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::new(value)
    }
}

impl From<Error> for Arg {
    fn from(value: Error) -> Self {
        Arg::new(value)
    }
}
