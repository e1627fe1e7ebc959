use fanout_core::SchedulerConfig;
use tracing::{debug, warn};

use crate::metrics::SchedulerMetrics;
use crate::registry::TaskRegistry;
use crate::task::{SchedulerError, Task};
use crate::types::SchedulerState;

/// Runs a fixed batch of tasks concurrently and collects one
/// [`TaskResult`](crate::TaskResult) per task.
///
/// A scheduler is single-use: once [`start`](Scheduler::start) has been
/// called it never accepts tasks or starts again.
pub struct Scheduler {
    pub(super) config: SchedulerConfig,
    /// Tasks waiting for `start()`.
    pub(super) registry: TaskRegistry,
    /// Number of tasks ever registered.
    pub(super) registered: usize,
    pub(super) state: SchedulerState,
    pub(super) metrics: SchedulerMetrics,
}

impl Scheduler {
    /// Create an empty scheduler with default config (one thread per task).
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            registry: TaskRegistry::new(),
            registered: 0,
            state: SchedulerState::Idle,
            metrics: SchedulerMetrics::default(),
        }
    }

    /// Register a named closure.
    pub fn add_task<F>(&mut self, name: impl Into<String>, work: F) -> Result<(), SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.register(Task::new(name, work))
    }

    /// Register a prepared [`Task`]. Fails once the scheduler has started.
    pub fn register(&mut self, task: Task) -> Result<(), SchedulerError> {
        if !self.state.accepts_tasks() {
            warn!(task = %task.name(), state = ?self.state, "rejected task added after start");
            return Err(SchedulerError::AlreadyStarted);
        }
        debug!(task = %task.name(), "Registered task");
        self.registry.push(task);
        self.registered += 1;
        Ok(())
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of tasks registered, including those already run.
    pub fn task_count(&self) -> usize {
        self.registered
    }

    /// Names of tasks still waiting to run, in registration order.
    pub fn pending_task_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Metrics of the run. Empty until `start()` returns.
    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
