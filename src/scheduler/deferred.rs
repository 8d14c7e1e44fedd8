//! A deferred result observed through an error callback.

use super::FailureCallback;
use crate::{Error, Result};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::trace;

enum State {
    /// No result yet; holds the errback if one was attached
    Waiting(Option<FailureCallback>),
    /// Failed before an errback was attached
    Failed(Error),
    /// Succeeded, or the failure was already delivered
    Settled,
}

/// A one-shot result that calls back only on failure.
///
/// The producer side calls [`resolve`](Deferred::resolve); the observer side
/// calls [`add_errback`](Deferred::add_errback). Either may happen first.
/// The errback runs on whichever thread completes the pair, never while the
/// internal lock is held.
#[derive(Clone)]
pub struct Deferred {
    state: Arc<Mutex<State>>,
}

impl Deferred {
    /// Create an unresolved deferred
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Waiting(None))),
        }
    }

    /// Record the result of the computation
    pub fn resolve(&self, result: Result<()>) {
        let errback = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, State::Settled) {
                State::Waiting(errback) => match (errback, result) {
                    (Some(errback), Err(err)) => Some((errback, err)),
                    (None, Err(err)) => {
                        *state = State::Failed(err);
                        None
                    }
                    (_, Ok(())) => None,
                },
                previous => {
                    trace!("Deferred already resolved");
                    *state = previous;
                    None
                }
            }
        };

        if let Some((errback, err)) = errback {
            errback(err);
        }
    }

    /// Attach the callback run on failure, replacing any earlier one
    pub fn add_errback(&self, errback: FailureCallback) {
        let failed = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, State::Settled) {
                State::Waiting(_) => {
                    *state = State::Waiting(Some(errback));
                    return;
                }
                State::Failed(err) => err,
                State::Settled => return,
            }
        };

        errback(failed);
    }

    /// Check if a result has been recorded
    pub fn is_resolved(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        !matches!(*state, State::Waiting(_))
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
