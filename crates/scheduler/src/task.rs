use std::fmt;

/// Boxed unit of work run by the scheduler.
pub type TaskFn = Box<dyn FnOnce() + Send + 'static>;

/// Error type for scheduler misuse.
///
/// Task faults are not errors: they are reported as
/// [`TaskResult::completed`](crate::TaskResult) `== false`.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler already started")]
    AlreadyStarted,
    #[error("Failed to build worker pool: {0}")]
    Pool(String),
}

/// A named unit of work. Immutable once registered.
pub struct Task {
    name: String,
    work: TaskFn,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            name: name.into(),
            work: Box::new(work),
        }
    }

    /// Human-readable name for logging and results. Not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into name and work, consuming the task.
    pub fn into_parts(self) -> (String, TaskFn) {
        (self.name, self.work)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
