use std::time::Instant;

use tracing::{info, warn};

use crate::collector::ResultCollector;
use crate::coordinator::CompletionCoordinator;
use crate::executor::Executor;
use crate::task::SchedulerError;
use crate::types::{SchedulerState, TaskResult};

use super::Scheduler;

impl Scheduler {
    /// Run every registered task concurrently and block until all have
    /// reported. Results come back in arrival order.
    ///
    /// Task panics never surface here; they appear as `completed == false`.
    /// Calling `start()` twice fails with [`SchedulerError::AlreadyStarted`].
    pub fn start(&mut self) -> Result<Vec<TaskResult>, SchedulerError> {
        if self.state != SchedulerState::Idle {
            warn!(state = ?self.state, "start() called on a scheduler that already ran");
            return Err(SchedulerError::AlreadyStarted);
        }

        // Build the pool before touching the registry so a failure leaves
        // the scheduler Idle with its tasks intact.
        let executor = Executor::new(&self.config)?;

        let tasks = self.registry.drain();
        let total = tasks.len();
        info!(
            "Scheduler starting {} tasks (max_concurrency: {})",
            total,
            if executor.is_bounded() {
                self.config.max_concurrency.to_string()
            } else {
                "unbounded".to_string()
            }
        );

        self.state = SchedulerState::Running;
        let run_started = Instant::now();

        let (sender, collector) =
            ResultCollector::with_capacity(self.config.resolved_result_buffer(total));
        let coordinator = CompletionCoordinator::arm(total, sender);
        let handles = executor.dispatch(tasks, &coordinator);

        self.state = SchedulerState::Draining;

        let mut results = Vec::with_capacity(total);
        for result in collector.drain() {
            self.metrics.record_result(&result);
            results.push(result);
        }

        Executor::join(handles);
        self.metrics.finish_run(run_started.elapsed());
        self.state = SchedulerState::Done;

        info!(
            completed = self.metrics.completed_count(),
            faulted = self.metrics.faulted_count(),
            wall_ms = self.metrics.wall_time.as_millis() as u64,
            "Scheduler finished"
        );

        if results.len() != total {
            warn!(expected = total, collected = results.len(), "result count mismatch");
        }

        Ok(results)
    }
}
