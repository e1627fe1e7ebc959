//! Result conduit between units of execution and the draining caller.

use std::sync::mpsc::{self, Receiver, SendError, SyncSender};

use tracing::warn;

use crate::types::TaskResult;

/// Cloneable producer half. One clone lives in each unit of execution.
#[derive(Debug, Clone)]
pub struct ResultSender {
    inner: SyncSender<TaskResult>,
}

impl ResultSender {
    /// Deliver a result. Returns `false` if the collector is gone, in which
    /// case the result is logged and discarded.
    pub fn send(&self, result: TaskResult) -> bool {
        match self.inner.send(result) {
            Ok(()) => true,
            Err(SendError(result)) => {
                warn!(task = %result.task_name, "result collector dropped, discarding result");
                false
            }
        }
    }
}

/// Consumer half. Yields results until every [`ResultSender`] is dropped.
#[derive(Debug)]
pub struct ResultCollector {
    receiver: Receiver<TaskResult>,
    capacity: usize,
}

impl ResultCollector {
    /// Create a conduit buffering up to `capacity` results (at least one).
    pub fn with_capacity(capacity: usize) -> (ResultSender, ResultCollector) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::sync_channel(capacity);
        (
            ResultSender { inner: tx },
            ResultCollector {
                receiver: rx,
                capacity,
            },
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocking iterator over results, ending when the conduit is closed.
    pub fn drain(self) -> impl Iterator<Item = TaskResult> {
        self.receiver.into_iter()
    }
}
