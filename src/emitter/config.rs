//! Configuration for the event emitter.

use tokio::runtime::Handle;

/// Configuration for the event emitter
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Runtime handed to the scheduler for pending computations.
    ///
    /// When unset, the scheduler uses whatever runtime `emit` is called from.
    pub runtime: Option<Handle>,

    /// Log every emission and listener invocation at trace level
    pub enable_tracing: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            enable_tracing: true,
        }
    }
}

impl EmitterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule pending computations on the given runtime
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Enable tracing
    pub fn enable_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    /// Configuration for testing
    pub fn test() -> Self {
        Self::default().enable_tracing(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmitterConfig::new();
        assert!(config.runtime.is_none());
        assert!(config.enable_tracing);
        assert!(!EmitterConfig::test().enable_tracing);
    }

    #[tokio::test]
    async fn test_runtime_setter() {
        let config = EmitterConfig::new().runtime(Handle::current());
        assert!(config.runtime.is_some());
    }
}
