//! Scheduler that runs each pending computation on its own OS thread.

use super::{Deferred, Scheduled, Scheduler};
use crate::listener::PendingComputation;
use crate::{Error, Result};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Handle;
use tracing::{debug, trace};

/// Runs pending computations to completion on dedicated threads.
///
/// Useful when no async runtime drives the emitter. Failures are reported
/// through a [`Deferred`] errback. If a runtime handle is configured, it is
/// entered on the worker thread so the computation can reach tokio resources.
/// The future itself is polled by `futures::executor::block_on`, so tokio
/// timers and IO only make progress if the runtime drives them: with a
/// multi-thread runtime they do; with a current-thread runtime that nothing
/// is blocking on, they never fire.
#[derive(Debug)]
pub struct ThreadScheduler {
    /// Worker thread name prefix
    name_prefix: String,

    /// Counter used to number worker threads
    spawned: AtomicUsize,
}

impl ThreadScheduler {
    /// Create a thread scheduler with the default thread name prefix
    pub fn new() -> Self {
        Self::with_name_prefix("emitter-worker")
    }

    /// Create a thread scheduler whose threads are named `{prefix}-{n}`
    pub fn with_name_prefix(prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: prefix.into(),
            spawned: AtomicUsize::new(0),
        }
    }

    /// Number of threads spawned so far
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, pending: PendingComputation, runtime: Option<&Handle>) -> Result<Scheduled> {
        let index = self.spawned.fetch_add(1, Ordering::Relaxed);
        let worker_name = format!("{}-{}", self.name_prefix, index);
        let deferred = Deferred::new();
        let producer = deferred.clone();
        let runtime = runtime.cloned();

        std::thread::Builder::new()
            .name(worker_name.clone())
            .spawn(move || {
                let _guard = runtime.as_ref().map(Handle::enter);
                trace!(worker = %worker_name, "Running pending computation");

                let result = futures::executor::block_on(AssertUnwindSafe(pending).catch_unwind())
                    .unwrap_or_else(|_| {
                        Err(Error::TaskFailed(format!("{} panicked", worker_name)))
                    });

                debug!(worker = %worker_name, ok = result.is_ok(), "Pending computation finished");
                producer.resolve(result);
            })
            .map_err(|e| Error::internal(format!("Failed to spawn scheduler thread: {}", e)))?;

        Ok(Scheduled::Errback(deferred))
    }

    fn name(&self) -> &str {
        &self.name_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn schedule_and_capture(pending: PendingComputation) -> mpsc::Receiver<Error> {
        let scheduler = ThreadScheduler::with_name_prefix("test-worker");
        let (tx, rx) = mpsc::channel();

        let scheduled = scheduler.schedule(pending, None).unwrap();
        assert!(matches!(scheduled, Scheduled::Errback(_)));
        scheduled.observe(Box::new(move |err| {
            let _ = tx.send(err);
        }));

        assert_eq!(scheduler.spawned(), 1);
        rx
    }

    #[test]
    fn test_failure_reaches_errback() {
        let rx = schedule_and_capture(Box::pin(async { Err(Error::handler("thread boom")) }));

        let err = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(err, Error::Handler(msg) if msg == "thread boom"));
    }

    #[test]
    fn test_panic_is_a_failure() {
        let fail = true;
        let rx = schedule_and_capture(Box::pin(async move {
            if fail {
                panic!("worker panicked");
            }
            Ok(())
        }));

        let err = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(err, Error::TaskFailed(msg) if msg.starts_with("test-worker-0")));
    }

    #[test]
    fn test_tokio_timers_with_multi_thread_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let scheduler = ThreadScheduler::new();
        let (tx, rx) = mpsc::channel();

        let scheduled = scheduler
            .schedule(
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    let _ = tx.send("woke");
                    Err(Error::handler("after sleep"))
                }),
                Some(runtime.handle()),
            )
            .unwrap();
        let (err_tx, err_rx) = mpsc::channel();
        scheduled.observe(Box::new(move |err| {
            let _ = err_tx.send(err);
        }));

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok("woke"));
        let err = err_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(err, Error::Handler(msg) if msg == "after sleep"));
    }

    #[test]
    fn test_success_is_silent() {
        let rx = schedule_and_capture(Box::pin(async { Ok(()) }));

        // The errback is dropped unused once the computation succeeds.
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
