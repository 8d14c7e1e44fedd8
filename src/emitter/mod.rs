//! The EventEmitter implementation.
//!
//! The emitter owns two registries: one keyed by exact event name and one
//! keyed by topic pattern. `emit` runs matching pattern listeners first, then
//! exact listeners, all on the calling thread. Listeners that return a
//! pending computation have it handed to the configured scheduler; if that
//! computation later fails, the failure is emitted as an `error` event.

use crate::event::{self, Arg, ERROR, NEW_LISTENER};
use crate::listener::{Listener, Outcome, PendingComputation};
use crate::registry::{ListenerRegistry, RegistryStatistics, RegistryStats};
use crate::scheduler::Scheduler;
use crate::topic::{self, TopicKind};
use crate::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

pub mod builder;
pub mod config;
pub mod registrar;

pub use builder::EmitterBuilder;
pub use config::EmitterConfig;
pub use registrar::Registrar;

pub(crate) struct Inner {
    pub(crate) config: EmitterConfig,
    pub(crate) scheduler: Arc<dyn Scheduler>,
    pub(crate) events: Arc<dyn ListenerRegistry>,
    pub(crate) patterns: Arc<dyn ListenerRegistry>,
    pub(crate) emissions: AtomicU64,
    pub(crate) scheduled: AtomicU64,
    pub(crate) async_failures: AtomicU64,
}

impl Inner {
    fn registry(&self, kind: TopicKind) -> &dyn ListenerRegistry {
        match kind {
            TopicKind::Exact => self.events.as_ref(),
            TopicKind::Pattern => self.patterns.as_ref(),
        }
    }

    fn registry_for(&self, event: &str) -> &dyn ListenerRegistry {
        self.registry(TopicKind::of(event))
    }
}

/// An event emitter with exact-name and topic-pattern listeners.
///
/// Cloning is cheap and every clone shares the same registries, which is how
/// listeners get hold of the emitter they are registered on.
///
/// Two events are reserved:
///
/// - `new_listener` is emitted by [`on`](Self::on) with `(event, listener)`
///   before the listener is added.
/// - `error` fails the emission when no exact listener is registered for it.
///
/// # Example
///
/// ```rust
/// use tokio_emitter::{Arg, EventEmitter, Listener};
///
/// # fn main() -> tokio_emitter::Result<()> {
/// let emitter = EventEmitter::new();
///
/// emitter.on("error", Listener::from_fn(|args| {
///     eprintln!("error: {}", args[0]);
/// }))?;
///
/// emitter.on("jobs/+/done", Listener::from_fn(|args| {
///     // Pattern listeners receive the emitted name first
///     assert_eq!(args[0].as_str(), Some("jobs/42/done"));
/// }))?;
///
/// emitter.emit("jobs/42/done", &[Arg::new(42u64)])?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EventEmitter {
    pub(crate) inner: Arc<Inner>,
}

impl EventEmitter {
    /// Create an emitter that schedules pending computations with tokio
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new EventEmitter builder
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new()
    }

    /// Get the emitter configuration
    pub fn config(&self) -> &EmitterConfig {
        &self.inner.config
    }

    /// Get the name of the configured scheduler
    pub fn scheduler_name(&self) -> &str {
        self.inner.scheduler.name()
    }

    /// Register `listener` for `event` and return it.
    ///
    /// `new_listener` is emitted first, with `(event, listener)`; if one of
    /// its listeners fails, the error is returned and nothing is registered.
    /// Names that are patterns go to the pattern registry.
    pub fn on(&self, event: &str, listener: Listener) -> Result<Listener> {
        self.emit(NEW_LISTENER, &[Arg::from(event), Arg::new(listener.clone())])?;

        let kind = TopicKind::of(event);
        trace!(
            event,
            listener_id = %listener.id(),
            ?kind,
            reserved = event::is_reserved(event),
            "Registering listener"
        );
        self.inner.registry(kind).append(event, listener.clone());

        Ok(listener)
    }

    /// Register `listener` for a single invocation and return it.
    ///
    /// What gets registered is an adapter around `listener`; the adapter
    /// removes itself right after `listener` returns successfully. Since the
    /// adapter is never handed out, the returned listener cannot be used to
    /// cancel the registration before it fires.
    pub fn once(&self, event: &str, listener: Listener) -> Result<Listener> {
        let adapter = self.once_adapter(event, listener.clone());
        self.on(event, adapter)?;
        Ok(listener)
    }

    fn once_adapter(&self, event: &str, listener: Listener) -> Listener {
        let id = Uuid::new_v4();
        let weak = Arc::downgrade(&self.inner);
        let event = event.to_string();
        let name = listener.name().map(|name| format!("once({})", name));

        let adapter = Listener::with_id(id, move |args| {
            let outcome = listener.call(args)?;

            // A nested emission may already have fired and removed us.
            if let Some(inner) = weak.upgrade() {
                if let Err(err) = inner.registry_for(&event).remove_first(&event, id) {
                    trace!(event = %event, error = %err, "Once listener already removed");
                }
            }

            Ok(outcome)
        });

        match name {
            Some(name) => adapter.with_name(name),
            None => adapter,
        }
    }

    /// Get a deferred registration for `event`
    pub fn registrar(&self, event: &str) -> Registrar {
        Registrar::new(self.clone(), event)
    }

    /// Emit `event` with `args`.
    ///
    /// Listeners of every registered pattern matching `event` run first, with
    /// the event name prepended to `args`; then the exact listeners of
    /// `event` run with `args` as given. A listener error stops the emission
    /// and is returned.
    ///
    /// Each pattern's list is read one index at a time while it runs, so a
    /// listener appended to it mid-emission runs in the same emission, while
    /// one that removes itself makes the next listener of that pattern skip
    /// this emission.
    ///
    /// Returns whether any exact listener ran. An `error` event with no exact
    /// listener fails with [`Error::Uncaught`] carrying `args[0]`, or with
    /// [`Error::UnhandledError`] when `args` is empty.
    pub fn emit(&self, event: &str, args: &[Arg]) -> Result<bool> {
        let inner = &self.inner;
        inner.emissions.fetch_add(1, Ordering::Relaxed);

        if inner.config.enable_tracing {
            trace!(event, args = args.len(), "Emitting event");
        }

        // Pattern names are snapshotted; each pattern's list is re-read per
        // invocation.
        let mut named_args: Option<Vec<Arg>> = None;
        for pattern in inner.patterns.names() {
            if !topic::matches(&pattern, event)? {
                continue;
            }

            let named_args = named_args.get_or_insert_with(|| {
                std::iter::once(Arg::from(event))
                    .chain(args.iter().cloned())
                    .collect()
            });

            let mut index = 0;
            while let Some(listener) = inner.patterns.get(&pattern, index) {
                self.invoke(event, &listener, named_args)?;
                index += 1;
            }
        }

        let listeners = inner.events.snapshot(event);
        let handled = !listeners.is_empty();
        for listener in &listeners {
            self.invoke(event, listener, args)?;
        }

        if !handled && event == ERROR {
            return Err(match args.first() {
                Some(arg) => Error::Uncaught(arg.clone()),
                None => Error::UnhandledError,
            });
        }

        Ok(handled)
    }

    fn invoke(&self, event: &str, listener: &Listener, args: &[Arg]) -> Result<()> {
        if self.inner.config.enable_tracing {
            trace!(event, listener_id = %listener.id(), "Invoking listener");
        }

        match listener.call(args)? {
            Outcome::Done => Ok(()),
            Outcome::Pending(pending) => self.handle_pending(event, pending),
        }
    }

    /// Schedule a pending computation and route its failure to `error`.
    fn handle_pending(&self, event: &str, pending: PendingComputation) -> Result<()> {
        let inner = &self.inner;
        let scheduled = inner
            .scheduler
            .schedule(pending, inner.config.runtime.as_ref())?;
        inner.scheduled.fetch_add(1, Ordering::Relaxed);

        let emitter = self.clone();
        let source = event.to_string();
        let observed = scheduled.observe(Box::new(move |err: Error| {
            emitter.inner.async_failures.fetch_add(1, Ordering::Relaxed);
            debug!(event = %source, error = %err, "Pending computation failed");

            if let Err(unhandled) = emitter.emit(ERROR, &[Arg::new(err)]) {
                error!(event = %source, error = %unhandled, "Unhandled error from pending computation");
            }
        }));

        if !observed {
            warn!(event, scheduler = inner.scheduler.name(), "Pending computation is not observed");
        }

        Ok(())
    }

    /// Remove the first registration of `listener` for `event`.
    ///
    /// Fails with [`Error::ListenerNotFound`] if it is not registered there.
    pub fn remove_listener(&self, event: &str, listener: &Listener) -> Result<()> {
        self.inner.registry_for(event).remove_first(event, listener.id())
    }

    /// Remove all listeners for `event`, or every listener when `None`.
    ///
    /// `event` is classified like any other registration name, so
    /// `"a/+"` clears the pattern `"a/+"` and `"a/#/c"` clears that exact name.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        match event {
            Some(event) => self.inner.registry_for(event).clear_name(event),
            None => {
                self.inner.events.clear();
                self.inner.patterns.clear();
                debug!("All listeners removed");
            }
        }
    }

    /// Snapshot of the listeners registered for `event`.
    ///
    /// Changing the returned list does not affect the registry.
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.inner.registry_for(event).snapshot(event)
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.registry_for(event).listener_count(event)
    }

    /// Exact names, then patterns, that currently have listeners
    pub fn event_names(&self) -> Vec<String> {
        [&self.inner.events, &self.inner.patterns]
            .into_iter()
            .flat_map(|registry| {
                registry
                    .names()
                    .into_iter()
                    .filter(|name| registry.listener_count(name) > 0)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Get statistics about the emitter
    pub fn stats(&self) -> EmitterStats {
        EmitterStats {
            events: self.inner.events.stats(),
            patterns: self.inner.patterns.stats(),
            emissions: self.inner.emissions.load(Ordering::Relaxed),
            scheduled: self.inner.scheduled.load(Ordering::Relaxed),
            async_failures: self.inner.async_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("scheduler", &self.inner.scheduler.name())
            .field("events", &self.inner.events)
            .field("patterns", &self.inner.patterns)
            .finish()
    }
}

/// Statistics about the event emitter
#[derive(Debug, Clone, Default)]
pub struct EmitterStats {
    /// Exact-name registry statistics
    pub events: RegistryStats,

    /// Pattern registry statistics
    pub patterns: RegistryStats,

    /// Total `emit` calls, including internal `new_listener` and `error` emissions
    pub emissions: u64,

    /// Pending computations handed to the scheduler
    pub scheduled: u64,

    /// Pending computations observed to fail
    pub async_failures: u64,
}

impl fmt::Display for EmitterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EventEmitter Stats: {} listeners on {} events, {} listeners on {} patterns, {} emissions, {} scheduled, {} failed",
            self.events.listeners,
            self.events.names,
            self.patterns.listeners,
            self.patterns.names,
            self.emissions,
            self.scheduled,
            self.async_failures
        )
    }
}
