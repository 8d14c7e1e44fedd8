//! Emission arguments and reserved event names.
//!
//! Events are plain strings. Every `emit` call carries a slice of [`Arg`]s,
//! type-erased values that listeners downcast to what they expect.

pub mod arg;

pub use arg::Arg;

/// Emitted by `on` before a listener is added, with `(event, listener)`.
pub const NEW_LISTENER: &str = "new_listener";

/// Emitting this event with no listener attached fails the emission.
pub const ERROR: &str = "error";

/// Check whether an event name is one of the reserved names
pub fn is_reserved(event: &str) -> bool {
    event == NEW_LISTENER || event == ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved("new_listener"));
        assert!(is_reserved("error"));
        assert!(!is_reserved("errors"));
        assert!(!is_reserved("a/error"));
    }
}
