//! Completion countdown that closes the result conduit exactly once.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::collector::ResultSender;
use crate::types::TaskResult;

/// Tracks outstanding units and owns the primary result sender.
///
/// The conduit closes once the primary sender is released here and every
/// unit has dropped its own clone. Units drop their clone before calling
/// [`task_done`](Self::task_done), so the release on the last decrement is
/// what ends the caller's drain.
#[derive(Debug)]
pub struct CompletionCoordinator {
    total: usize,
    remaining: AtomicUsize,
    sender: Mutex<Option<ResultSender>>,
    closed: AtomicBool,
}

impl CompletionCoordinator {
    /// Arm the countdown for `total` units. With zero units the conduit is
    /// closed immediately.
    pub fn arm(total: usize, sender: ResultSender) -> Arc<Self> {
        let coordinator = Self {
            total,
            remaining: AtomicUsize::new(total),
            sender: Mutex::new(Some(sender)),
            closed: AtomicBool::new(false),
        };
        if total == 0 {
            coordinator.close();
        }
        Arc::new(coordinator)
    }

    /// A sender clone for a unit, or `None` once closed.
    pub fn sender(&self) -> Option<ResultSender> {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record that one unit has reported. Exactly one call per unit.
    pub fn task_done(&self) {
        let prev = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match prev {
            Ok(1) => self.close(),
            Ok(_) => {}
            Err(_) => error!(total = self.total, "task_done called more times than tasks registered"),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        let released = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            self.closed.store(true, Ordering::Release);
            debug!(total = self.total, "all tasks reported, result channel closed");
        }
    }
}

/// Per-unit handle: reports one result and signals the coordinator on drop.
///
/// If the unit is dropped without reporting (for example its thread never
/// spawned) the guard reports a fault itself, so every task still yields
/// exactly one result.
#[derive(Debug)]
pub struct CompletionGuard {
    coordinator: Arc<CompletionCoordinator>,
    sender: Option<ResultSender>,
    task_name: String,
    reported: bool,
}

impl CompletionGuard {
    pub fn new(coordinator: Arc<CompletionCoordinator>, task_name: String) -> Self {
        let sender = coordinator.sender();
        Self {
            coordinator,
            sender,
            task_name,
            reported: false,
        }
    }

    /// Send the unit's result. The coordinator is signalled when `self` drops.
    pub fn report(mut self, result: TaskResult) {
        self.send(result);
    }

    fn send(&mut self, result: TaskResult) {
        self.reported = true;
        match self.sender.take() {
            Some(sender) => {
                sender.send(result);
            }
            None => error!(task = %result.task_name, "result channel closed before task reported"),
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.reported {
            warn!(task = %self.task_name, "task dropped before it ran, reporting fault");
            let result = TaskResult::faulted(
                std::mem::take(&mut self.task_name),
                Utc::now(),
                Duration::ZERO,
                "task never ran: unit of execution dropped before start",
            );
            self.send(result);
        }
        // Release our sender clone before the countdown can close the channel.
        self.sender = None;
        self.coordinator.task_done();
    }
}
