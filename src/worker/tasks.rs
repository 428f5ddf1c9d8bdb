//! Background task bookkeeping
//!
//! Cache writes and revalidation fetches run off the request path. The
//! handles are retained so the host (or a test) can await quiescence,
//! the same contract a worker runtime offers through wait-until: work
//! that is not registered here may be abandoned when the worker stops.

use std::future::Future;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Holds handles for in-flight background work
#[derive(Default)]
pub struct BackgroundTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a fire-and-forget task and retain its handle
    ///
    /// The future must do its own error logging; nothing is propagated.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(fut);
        self.handles
            .lock()
            .expect("task list lock poisoned")
            .push(handle);
    }

    /// Number of tasks spawned since the last settle
    pub fn pending(&self) -> usize {
        self.handles.lock().expect("task list lock poisoned").len()
    }

    /// Await every in-flight task, including ones spawned while settling
    pub async fn settle(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut handles = self.handles.lock().expect("task list lock poisoned");
                handles.drain(..).collect()
            };
            if drained.is_empty() {
                break;
            }
            debug!("Settling {} background tasks", drained.len());
            for handle in drained {
                // A panicked task was already logged by the panic hook;
                // settle just needs to observe completion.
                let _ = handle.await;
            }
        }
    }
}
