//! What a listener hands back to the emitter.

use crate::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// An asynchronous unit of work returned by a listener.
///
/// The emitter never awaits it; it is passed to the configured scheduler.
pub type PendingComputation = BoxFuture<'static, Result<()>>;

/// The result of invoking a listener.
#[derive(Default)]
pub enum Outcome {
    /// The listener finished its work synchronously
    #[default]
    Done,
    /// The listener started asynchronous work that should be scheduled
    Pending(PendingComputation),
}

impl Outcome {
    /// Wrap a future as a pending outcome
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Outcome::Pending(Box::pin(future))
    }

    /// Check if this outcome carries a pending computation
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => f.write_str("Done"),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_kinds() {
        assert!(!Outcome::Done.is_pending());
        assert!(!Outcome::default().is_pending());
        assert!(Outcome::pending(async { Ok(()) }).is_pending());
        assert_eq!(format!("{:?}", Outcome::pending(async { Ok(()) })), "Pending(..)");
    }
}
