//! DashMap-based implementation of ListenerRegistry.

use super::ListenerRegistry;
use crate::listener::Listener;
use crate::{Error, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};
use uuid::Uuid;

/// Listeners for one name, plus the position of that name in registration order
#[derive(Debug, Default)]
struct Slot {
    order: u64,
    listeners: Vec<Listener>,
}

/// A thread-safe listener registry using DashMap.
///
/// Every method takes and releases its shard lock before returning, so
/// callers never hold a guard while running a listener.
#[derive(Debug, Default)]
pub struct DashMapRegistry {
    /// Map from registration name to its listeners
    slots: DashMap<String, Slot>,

    /// Source of the order stamps that keep `names` in insertion order
    next_order: AtomicU64,
}

impl DashMapRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity),
            next_order: AtomicU64::new(0),
        }
    }
}

impl ListenerRegistry for DashMapRegistry {
    fn append(&self, name: &str, listener: Listener) {
        trace!(name, listener_id = %listener.id(), "Appending listener");

        self.slots
            .entry(name.to_string())
            .or_insert_with(|| Slot {
                order: self.next_order.fetch_add(1, Ordering::Relaxed),
                listeners: Vec::new(),
            })
            .listeners
            .push(listener);
    }

    fn remove_first(&self, name: &str, listener_id: Uuid) -> Result<()> {
        let not_found = || Error::ListenerNotFound {
            event: name.to_string(),
            listener: listener_id,
        };

        let mut slot = self.slots.get_mut(name).ok_or_else(not_found)?;
        let position = slot
            .listeners
            .iter()
            .position(|l| l.id() == listener_id)
            .ok_or_else(not_found)?;
        slot.listeners.remove(position);

        debug!(name, listener_id = %listener_id, "Listener removed");
        Ok(())
    }

    fn snapshot(&self, name: &str) -> Vec<Listener> {
        self.slots
            .get(name)
            .map(|slot| slot.listeners.clone())
            .unwrap_or_default()
    }

    fn get(&self, name: &str, index: usize) -> Option<Listener> {
        self.slots
            .get(name)
            .and_then(|slot| slot.listeners.get(index).cloned())
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<(u64, String)> = self
            .slots
            .iter()
            .map(|entry| (entry.value().order, entry.key().clone()))
            .collect();
        names.sort_unstable_by_key(|(order, _)| *order);
        names.into_iter().map(|(_, name)| name).collect()
    }

    fn listener_count(&self, name: &str) -> usize {
        self.slots
            .get(name)
            .map(|slot| slot.listeners.len())
            .unwrap_or(0)
    }

    fn total_listeners(&self) -> usize {
        self.slots
            .iter()
            .map(|entry| entry.value().listeners.len())
            .sum()
    }

    fn clear_name(&self, name: &str) {
        if let Some(mut slot) = self.slots.get_mut(name) {
            slot.listeners.clear();
            debug!(name, "Listeners cleared");
        }
    }

    fn clear(&self) {
        self.slots.clear();
        debug!("Registry cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener() -> Listener {
        Listener::from_fn(|_| {})
    }

    #[test]
    fn test_append_and_snapshot() {
        let registry = DashMapRegistry::new();
        let first = listener();
        let second = listener();

        registry.append("data", first.clone());
        registry.append("data", second.clone());

        assert_eq!(registry.snapshot("data"), vec![first, second]);
        assert!(registry.snapshot("other").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept_and_removed_one_at_a_time() {
        let registry = DashMapRegistry::new();
        let l = listener();

        registry.append("data", l.clone());
        registry.append("data", l.clone());
        assert_eq!(registry.listener_count("data"), 2);

        registry.remove_first("data", l.id()).unwrap();
        assert_eq!(registry.listener_count("data"), 1);

        registry.remove_first("data", l.id()).unwrap();
        assert_eq!(registry.listener_count("data"), 0);
    }

    #[test]
    fn test_remove_first_keeps_later_duplicates_in_place() {
        let registry = DashMapRegistry::new();
        let a = listener();
        let b = listener();

        registry.append("data", a.clone());
        registry.append("data", b.clone());
        registry.append("data", a.clone());

        registry.remove_first("data", a.id()).unwrap();
        assert_eq!(registry.snapshot("data"), vec![b, a]);
    }

    #[test]
    fn test_remove_missing_listener() {
        let registry = DashMapRegistry::new();
        let l = listener();

        let err = registry.remove_first("data", l.id()).unwrap_err();
        assert!(matches!(err, Error::ListenerNotFound { ref event, .. } if event == "data"));

        registry.append("data", listener());
        assert!(registry.remove_first("data", l.id()).is_err());
    }

    #[test]
    fn test_get_reads_current_list() {
        let registry = DashMapRegistry::new();
        let a = listener();
        let b = listener();

        registry.append("p/#", a.clone());
        assert_eq!(registry.get("p/#", 0), Some(a.clone()));
        assert_eq!(registry.get("p/#", 1), None);

        registry.append("p/#", b.clone());
        assert_eq!(registry.get("p/#", 1), Some(b));
        assert_eq!(registry.get("missing", 0), None);
    }

    #[test]
    fn test_names_in_registration_order() {
        let registry = DashMapRegistry::with_capacity(8);
        for name in ["c/#", "a/+", "b/#", "a/+"] {
            registry.append(name, listener());
        }

        assert_eq!(registry.names(), vec!["c/#", "a/+", "b/#"]);
    }

    #[test]
    fn test_clear_name_keeps_position() {
        let registry = DashMapRegistry::new();
        registry.append("first", listener());
        registry.append("second", listener());

        registry.clear_name("first");
        registry.append("first", listener());

        assert_eq!(registry.names(), vec!["first", "second"]);
        assert_eq!(registry.total_listeners(), 2);
    }

    #[test]
    fn test_clear() {
        let registry = DashMapRegistry::new();
        registry.append("a", listener());
        registry.append("b", listener());

        registry.clear();

        assert!(registry.names().is_empty());
        assert_eq!(registry.total_listeners(), 0);
    }
}
