//! Deferred registration.

use super::EventEmitter;
use crate::listener::Listener;
use crate::Result;

/// A registration waiting for its listener.
///
/// Returned by [`EventEmitter::registrar`]; lets the event name be chosen in
/// one place and the listener supplied in another.
///
/// ```rust
/// use tokio_emitter::{EventEmitter, Listener};
///
/// # fn main() -> tokio_emitter::Result<()> {
/// let emitter = EventEmitter::new();
/// let on_ready = emitter.registrar("ready");
///
/// let listener = on_ready.on(Listener::from_fn(|_| println!("ready")))?;
/// assert_eq!(emitter.listeners("ready"), vec![listener]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[must_use = "a registrar does nothing until `on` or `once` is called"]
pub struct Registrar {
    emitter: EventEmitter,
    event: String,
}

impl Registrar {
    pub(crate) fn new(emitter: EventEmitter, event: &str) -> Self {
        Self {
            emitter,
            event: event.to_string(),
        }
    }

    /// Get the event name this registrar registers against
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Register `listener` as with [`EventEmitter::on`], returning it unchanged
    pub fn on(self, listener: Listener) -> Result<Listener> {
        self.emitter.on(&self.event, listener)
    }

    /// Register `listener` as with [`EventEmitter::once`], returning it unchanged
    pub fn once(self, listener: Listener) -> Result<Listener> {
        self.emitter.once(&self.event, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_registrar_on_returns_listener() {
        let emitter = EventEmitter::new();
        let listener = Listener::from_fn(|_| {});

        let registrar = emitter.registrar("a/+");
        assert_eq!(registrar.event(), "a/+");

        let returned = registrar.on(listener.clone()).unwrap();
        assert_eq!(returned, listener);

        // The returned handle removes the registration
        emitter.remove_listener("a/+", &returned).unwrap();
        assert!(emitter.listeners("a/+").is_empty());
    }

    #[test]
    fn test_registrar_once() {
        let emitter = EventEmitter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let listener = Listener::from_fn(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let returned = emitter.registrar("tick").once(listener.clone()).unwrap();
        assert_eq!(returned, listener);

        emitter.emit("tick", &[]).unwrap();
        emitter.emit("tick", &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
