use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::Utc;
use fanout_core::SchedulerConfig;
use tracing::{debug, error, warn};

use crate::coordinator::{CompletionCoordinator, CompletionGuard};
use crate::task::{SchedulerError, Task, TaskFn};
use crate::types::TaskResult;

/// Launches one unit of execution per task.
///
/// Unbounded by default: every task gets its own named OS thread. With
/// `max_concurrency > 0` units are queued onto a rayon pool of that size.
pub struct Executor {
    config: SchedulerConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Executor {
    pub fn new(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        let pool = if config.is_bounded() {
            let prefix = config.thread_name_prefix.clone();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_concurrency)
                .thread_name(move |i| format!("{}-pool-{}", prefix, i))
                .build()
                .map_err(|e| SchedulerError::Pool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config: config.clone(),
            pool,
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.pool.is_some()
    }

    /// Launch every task. Returns join handles for thread-per-task units
    /// (empty when running on the pool).
    ///
    /// Each unit reports through a [`CompletionGuard`], so a task whose
    /// thread fails to spawn still yields a faulted result.
    pub fn dispatch(
        &self,
        tasks: Vec<Task>,
        coordinator: &Arc<CompletionCoordinator>,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let (name, work) = task.into_parts();
            let guard = CompletionGuard::new(Arc::clone(coordinator), name.clone());
            let unit = move || run_unit(name, work, guard);

            match &self.pool {
                Some(pool) => pool.spawn(unit),
                None => {
                    let thread_name = self.config.thread_name(index);
                    match thread::Builder::new().name(thread_name.clone()).spawn(unit) {
                        Ok(handle) => handles.push(handle),
                        Err(e) => error!(thread = %thread_name, error = %e, "failed to spawn task thread"),
                    }
                }
            }
        }

        handles
    }

    /// Join thread-per-task units after the drain finished.
    pub fn join(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
            if handle.join().is_err() {
                error!(thread = %name, "task thread panicked outside the fault barrier");
            }
        }
    }
}

/// Body of one unit: time the work, contain any panic, report once.
pub(crate) fn run_unit(name: String, work: TaskFn, guard: CompletionGuard) {
    let started_at = Utc::now();
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(work));
    let duration = start.elapsed();

    let result = match outcome {
        Ok(()) => {
            debug!(task = %name, duration_ms = duration.as_millis() as u64, "task completed");
            TaskResult::completed(name, started_at, duration)
        }
        Err(payload) => {
            let fault = panic_message(&*payload);
            warn!(task = %name, duration_ms = duration.as_millis() as u64, fault = %fault, "task panicked");
            TaskResult::faulted(name, started_at, duration, fault)
        }
    };

    guard.report(result);
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ResultCollector;
    use std::time::Duration;

    fn run_single(work: TaskFn) -> TaskResult {
        let (tx, collector) = ResultCollector::with_capacity(1);
        let coordinator = CompletionCoordinator::arm(1, tx);
        let guard = CompletionGuard::new(Arc::clone(&coordinator), "unit".into());
        run_unit("unit".into(), work, guard);
        assert!(coordinator.is_closed());
        let mut results: Vec<TaskResult> = collector.drain().collect();
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    #[test]
    fn run_unit_reports_completion() {
        let result = run_single(Box::new(|| thread::sleep(Duration::from_millis(5))));
        assert!(result.completed);
        assert!(result.duration >= Duration::from_millis(5));
    }

    #[test]
    fn run_unit_contains_str_panic() {
        let result = run_single(Box::new(|| panic!("static boom")));
        assert!(!result.completed);
        assert_eq!(result.fault.as_deref(), Some("static boom"));
    }

    #[test]
    fn run_unit_contains_formatted_panic() {
        let code = 42;
        let result = run_single(Box::new(move || panic!("code {}", code)));
        assert!(!result.completed);
        assert_eq!(result.fault.as_deref(), Some("code 42"));
    }

    #[test]
    fn non_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }

    #[test]
    fn bounded_executor_builds_pool() {
        let config = SchedulerConfig { max_concurrency: 2, ..SchedulerConfig::default() };
        let executor = Executor::new(&config).unwrap();
        assert!(executor.is_bounded());

        let unbounded = Executor::new(&SchedulerConfig::default()).unwrap();
        assert!(!unbounded.is_bounded());
    }

    #[test]
    fn dispatch_names_threads() {
        let (tx, collector) = ResultCollector::with_capacity(1);
        let coordinator = CompletionCoordinator::arm(1, tx);
        let executor = Executor::new(&SchedulerConfig::default()).unwrap();

        let seen = Arc::new(std::sync::Mutex::new(None));
        let slot = Arc::clone(&seen);
        let task = Task::new("named", move || {
            *slot.lock().unwrap() = thread::current().name().map(str::to_string);
        });

        let handles = executor.dispatch(vec![task], &coordinator);
        assert_eq!(collector.drain().count(), 1);
        Executor::join(handles);

        assert_eq!(seen.lock().unwrap().as_deref(), Some("fanout-task-0"));
    }
}
