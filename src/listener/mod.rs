//! Listener references.
//!
//! A [`Listener`] is a shared handle to a callable. Registering the same
//! handle twice stores it twice, and removal goes by handle identity, so keep
//! the value returned by `on` around if you want to remove it later.

use crate::event::Arg;
use crate::Result;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

pub mod outcome;

pub use outcome::{Outcome, PendingComputation};

type ListenerFn = dyn Fn(&[Arg]) -> Result<Outcome> + Send + Sync + 'static;

/// A registered callable.
///
/// Clones share the callable and compare equal to each other; two listeners
/// built from identical closures do not.
#[derive(Clone)]
pub struct Listener {
    /// Identity of the shared callable
    id: Uuid,

    /// Optional name for debugging
    name: Option<Arc<str>>,

    function: Arc<ListenerFn>,
}

impl Listener {
    /// Create a listener from a fallible callable that reports its outcome
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<Outcome> + Send + Sync + 'static,
    {
        Self::with_id(Uuid::new_v4(), function)
    }

    pub(crate) fn with_id<F>(id: Uuid, function: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<Outcome> + Send + Sync + 'static,
    {
        Self {
            id,
            name: None,
            function: Arc::new(function),
        }
    }

    /// Create a listener from a synchronous callable that cannot fail
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(&[Arg]) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            function(args);
            Ok(Outcome::Done)
        })
    }

    /// Create a listener whose work happens in a future.
    ///
    /// The future is scheduled by the emitter; a failure is re-emitted as an
    /// `error` event instead of being returned from `emit`.
    pub fn from_async<F, Fut>(function: F) -> Self
    where
        F: Fn(&[Arg]) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::new(move |args| Ok(Outcome::pending(function(args))))
    }

    /// Attach a debugging name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Arc::from(name.into()));
        self
    }

    /// Get the listener ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the listener name if set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke the callable
    pub fn call(&self, args: &[Arg]) -> Result<Outcome> {
        (self.function)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Listener '{}' ({})", name, self.id),
            None => write!(f, "Listener {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_identity() {
        let a = Listener::from_fn(|_| {});
        let b = Listener::from_fn(|_| {});

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.clone().with_name("renamed"), a);
    }

    #[test]
    fn test_from_fn_is_done() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let listener = Listener::from_fn(move |args| {
            calls_clone.fetch_add(args.len(), Ordering::SeqCst);
        });

        let outcome = listener.call(&[Arg::new(1u8), Arg::new(2u8)]).unwrap();
        assert!(!outcome.is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_async_is_pending() {
        let listener = Listener::from_async(|_| async { Ok(()) });
        assert!(listener.call(&[]).unwrap().is_pending());
    }

    #[test]
    fn test_errors_are_returned() {
        let listener = Listener::new(|_| Err(Error::handler("nope")));
        assert!(matches!(listener.call(&[]), Err(Error::Handler(_))));
    }

    #[test]
    fn test_display() {
        let listener = Listener::from_fn(|_| {}).with_name("audit");
        assert_eq!(
            listener.to_string(),
            format!("Listener 'audit' ({})", listener.id())
        );
        assert_eq!(listener.name(), Some("audit"));
    }
}
