//! Builder pattern for constructing EventEmitter instances.

use super::config::EmitterConfig;
use super::{EventEmitter, Inner};
use crate::registry::{DashMapRegistry, ListenerRegistry};
use crate::scheduler::{Scheduler, TokioScheduler};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Builder for creating EventEmitter instances
#[allow(missing_debug_implementations)]
pub struct EmitterBuilder {
    config: EmitterConfig,
    scheduler: Option<Arc<dyn Scheduler>>,
    registries: Option<(Arc<dyn ListenerRegistry>, Arc<dyn ListenerRegistry>)>,
}

impl EmitterBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: EmitterConfig::default(),
            scheduler: None,
            registries: None,
        }
    }

    /// Use a custom configuration
    pub fn config(mut self, config: EmitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure the emitter
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EmitterConfig) -> EmitterConfig,
    {
        self.config = f(self.config);
        self
    }

    /// Schedule pending computations on the given runtime
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.config = self.config.runtime(handle);
        self
    }

    /// Use a custom scheduler for pending computations
    pub fn scheduler<S>(mut self, scheduler: S) -> Self
    where
        S: Scheduler + 'static,
    {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }

    /// Use custom registries for exact names and for patterns
    pub fn registries(
        mut self,
        events: Arc<dyn ListenerRegistry>,
        patterns: Arc<dyn ListenerRegistry>,
    ) -> Self {
        self.registries = Some((events, patterns));
        self
    }

    /// Build the EventEmitter
    pub fn build(self) -> EventEmitter {
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::new()),
        };
        let (events, patterns) = match self.registries {
            Some(registries) => registries,
            None => (default_registry(), default_registry()),
        };

        debug!(scheduler = scheduler.name(), "Building EventEmitter");

        EventEmitter {
            inner: Arc::new(Inner {
                config: self.config,
                scheduler,
                events,
                patterns,
                emissions: AtomicU64::new(0),
                scheduled: AtomicU64::new(0),
                async_failures: AtomicU64::new(0),
            }),
        }
    }
}

fn default_registry() -> Arc<dyn ListenerRegistry> {
    Arc::new(DashMapRegistry::with_capacity(16))
}

impl Default for EmitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ThreadScheduler;

    #[test]
    fn test_builder_default() {
        let emitter = EmitterBuilder::new().build();
        assert_eq!(emitter.scheduler_name(), "tokio");
        assert!(emitter.config().enable_tracing);
    }

    #[test]
    fn test_builder_configurations() {
        let emitter = EmitterBuilder::new()
            .configure(|c| c.enable_tracing(false))
            .scheduler(ThreadScheduler::with_name_prefix("custom"))
            .build();

        assert_eq!(emitter.scheduler_name(), "custom");
        assert!(!emitter.config().enable_tracing);
    }

    #[test]
    fn test_builder_custom_registries() {
        let events = Arc::new(DashMapRegistry::new());
        let patterns = Arc::new(DashMapRegistry::new());
        let emitter = EmitterBuilder::new()
            .registries(events.clone(), patterns.clone())
            .build();

        emitter.on("exact", crate::Listener::from_fn(|_| {})).unwrap();
        emitter.on("pat/#", crate::Listener::from_fn(|_| {})).unwrap();

        assert_eq!(events.total_listeners(), 1);
        assert_eq!(patterns.total_listeners(), 1);
    }
}
