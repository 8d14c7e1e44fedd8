//! Listener registries.
//!
//! A registry maps a registration name to an ordered list of listeners. The
//! emitter keeps two of them, one for exact names and one for patterns.
//! Registries hand out clones so that no internal lock is held while a
//! listener runs; listeners are free to register or remove other listeners
//! in the middle of an emission.

use crate::listener::Listener;
use crate::Result;
use std::fmt::Debug;
use uuid::Uuid;

mod dashmap;
pub use dashmap::DashMapRegistry;

/// Trait for registries that map names to ordered listener lists.
///
/// Implementations must be thread-safe; the async bridge re-enters the
/// emitter from runtime tasks.
pub trait ListenerRegistry: Send + Sync + Debug {
    /// Append a listener to the end of `name`'s list
    fn append(&self, name: &str, listener: Listener);

    /// Remove the first listener with the given ID from `name`'s list
    fn remove_first(&self, name: &str, listener_id: Uuid) -> Result<()>;

    /// Copy of `name`'s list at the time of the call
    fn snapshot(&self, name: &str) -> Vec<Listener>;

    /// The listener currently at `index` in `name`'s list
    fn get(&self, name: &str, index: usize) -> Option<Listener>;

    /// All names ever registered, in first-registration order.
    ///
    /// Names whose lists have been emptied are included.
    fn names(&self) -> Vec<String>;

    /// Number of listeners registered for `name`
    fn listener_count(&self, name: &str) -> usize;

    /// Number of listeners across all names
    fn total_listeners(&self) -> usize;

    /// Empty `name`'s list
    fn clear_name(&self, name: &str);

    /// Drop every name and listener
    fn clear(&self);
}

/// Registry statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Names with at least one listener
    pub names: usize,

    /// Total number of listeners
    pub listeners: usize,
}

/// Extension trait for registries with statistics
pub trait RegistryStatistics: ListenerRegistry {
    /// Get current registry statistics
    fn stats(&self) -> RegistryStats {
        let names = self
            .names()
            .iter()
            .filter(|name| self.listener_count(name) > 0)
            .count();

        RegistryStats {
            names,
            listeners: self.total_listeners(),
        }
    }
}

impl<T: ListenerRegistry + ?Sized> RegistryStatistics for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_skip_emptied_names() {
        let registry = DashMapRegistry::new();
        let listener = Listener::from_fn(|_| {});

        registry.append("a", listener.clone());
        registry.append("a", listener.clone());
        registry.append("b", listener.clone());
        registry.clear_name("b");

        let stats = registry.stats();
        assert_eq!(stats, RegistryStats { names: 1, listeners: 2 });
    }

    #[test]
    fn test_stats_through_trait_object() {
        let registry: Box<dyn ListenerRegistry> = Box::new(DashMapRegistry::new());
        registry.append("x", Listener::from_fn(|_| {}));
        assert_eq!(registry.stats().listeners, 1);
    }
}
