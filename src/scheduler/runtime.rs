//! Scheduler that spawns pending computations onto a tokio runtime.

use super::{Scheduled, Scheduler};
use crate::listener::PendingComputation;
use crate::{Error, Result};
use tokio::runtime::Handle;
use tracing::trace;

/// The default scheduler.
///
/// Spawns onto the runtime handle configured on the emitter, or onto the
/// runtime the caller of `emit` is running in. Completion is observed through
/// the task's join handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a new tokio scheduler
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, pending: PendingComputation, runtime: Option<&Handle>) -> Result<Scheduled> {
        let runtime = match runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|_| Error::NoRuntime)?,
        };

        let task = runtime.spawn(pending);
        trace!(scheduler = self.name(), "Spawned pending computation");

        Ok(Scheduled::Joinable { task, runtime })
    }

    fn name(&self) -> &str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::{timeout, Duration};

    #[test]
    fn test_no_runtime() {
        let err = TokioScheduler::new()
            .schedule(Box::pin(async { Ok(()) }), None)
            .unwrap_err();
        assert!(matches!(err, Error::NoRuntime));
    }

    #[tokio::test]
    async fn test_spawns_on_current_runtime() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let scheduled = TokioScheduler
            .schedule(
                Box::pin(async move {
                    ran_clone.store(true, Ordering::SeqCst);
                    Ok(())
                }),
                None,
            )
            .unwrap();

        match scheduled {
            Scheduled::Joinable { task, .. } => {
                timeout(Duration::from_secs(1), task).await.unwrap().unwrap().unwrap();
            }
            other => panic!("expected a joinable task, got {:?}", other),
        }
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_spawns_on_configured_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let scheduled = TokioScheduler
            .schedule(Box::pin(async { Err(Error::handler("x")) }), Some(runtime.handle()))
            .unwrap();

        let Scheduled::Joinable { task, .. } = scheduled else {
            panic!("expected a joinable task");
        };
        let result = runtime.block_on(task).unwrap();
        assert!(result.is_err());
    }
}
