//! Scheduling of pending computations.
//!
//! When a listener returns [`Outcome::Pending`](crate::Outcome::Pending), the
//! emitter hands the future to a [`Scheduler`] and keeps going. The scheduler
//! returns a [`Scheduled`] handle, which the emitter observes so that a
//! failed computation can be re-emitted as an `error` event.

use crate::listener::PendingComputation;
use crate::{Error, Result};
use std::fmt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

pub mod deferred;
pub mod runtime;
pub mod thread;

pub use deferred::Deferred;
pub use runtime::TokioScheduler;
pub use thread::ThreadScheduler;

/// Callback run with the fault of a failed computation
pub type FailureCallback = Box<dyn FnOnce(Error) + Send + 'static>;

/// Trait for schedulers that start pending computations.
pub trait Scheduler: Send + Sync {
    /// Start `pending`, optionally on the given runtime, and return a handle
    /// through which its failure can be observed.
    fn schedule(&self, pending: PendingComputation, runtime: Option<&Handle>) -> Result<Scheduled>;

    /// Get the scheduler name for debugging
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Handle to a scheduled computation.
///
/// The variants are the two completion conventions a scheduler can offer,
/// plus an escape hatch for schedulers that offer none.
pub enum Scheduled {
    /// A task whose result is inspected once it completes
    Joinable {
        /// The spawned task
        task: JoinHandle<Result<()>>,
        /// Runtime used to wait for the task
        runtime: Handle,
    },

    /// A deferred result that only calls back on failure
    Errback(Deferred),

    /// Completion cannot be observed
    Detached,
}

impl Scheduled {
    /// Arrange for `on_failure` to run if the computation fails.
    ///
    /// Returns false for [`Scheduled::Detached`], whose outcome is dropped.
    pub fn observe(self, on_failure: FailureCallback) -> bool {
        match self {
            Scheduled::Joinable { task, runtime } => {
                runtime.spawn(async move {
                    match task.await {
                        Ok(Ok(())) => trace!("Scheduled task completed"),
                        Ok(Err(err)) => on_failure(err),
                        Err(join_err) => on_failure(Error::TaskFailed(join_err.to_string())),
                    }
                });
                true
            }
            Scheduled::Errback(deferred) => {
                deferred.add_errback(on_failure);
                true
            }
            Scheduled::Detached => false,
        }
    }

    /// Check if completion of this computation can be observed
    pub fn is_observable(&self) -> bool {
        !matches!(self, Scheduled::Detached)
    }
}

impl fmt::Debug for Scheduled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheduled::Joinable { task, .. } => f
                .debug_struct("Joinable")
                .field("finished", &task.is_finished())
                .finish(),
            Scheduled::Errback(deferred) => f.debug_tuple("Errback").field(deferred).finish(),
            Scheduled::Detached => f.write_str("Detached"),
        }
    }
}

/// A scheduler that drops every pending computation without running it
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpScheduler;

impl Scheduler for NoOpScheduler {
    fn schedule(&self, _pending: PendingComputation, _runtime: Option<&Handle>) -> Result<Scheduled> {
        Ok(Scheduled::Detached)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
