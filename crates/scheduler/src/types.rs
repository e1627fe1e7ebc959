use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one registered task. Exactly one is produced per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    /// Name of the task that produced this result.
    pub task_name: String,
    /// Wall-clock time from just before the work ran until it returned or panicked.
    pub duration: Duration,
    /// `true` if the work returned normally, `false` if it panicked.
    pub completed: bool,
    /// When the work was invoked.
    pub started_at: DateTime<Utc>,
    /// Panic message for faulted tasks.
    pub fault: Option<String>,
}

impl TaskResult {
    pub fn completed(task_name: String, started_at: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            task_name,
            duration,
            completed: true,
            started_at,
            fault: None,
        }
    }

    pub fn faulted(
        task_name: String,
        started_at: DateTime<Utc>,
        duration: Duration,
        fault: impl Into<String>,
    ) -> Self {
        Self {
            task_name,
            duration,
            completed: false,
            started_at,
            fault: Some(fault.into()),
        }
    }
}

/// Scheduler lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchedulerState {
    /// Accepting tasks.
    Idle,
    /// Dispatching units of execution.
    Running,
    /// All units dispatched, collecting results.
    Draining,
    /// Every result collected and the channel closed.
    Done,
}

impl SchedulerState {
    pub fn accepts_tasks(self) -> bool {
        self == SchedulerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_ordering_follows_lifecycle() {
        assert!(SchedulerState::Idle < SchedulerState::Running);
        assert!(SchedulerState::Running < SchedulerState::Draining);
        assert!(SchedulerState::Draining < SchedulerState::Done);
    }

    #[test]
    fn only_idle_accepts_tasks() {
        assert!(SchedulerState::Idle.accepts_tasks());
        assert!(!SchedulerState::Running.accepts_tasks());
        assert!(!SchedulerState::Done.accepts_tasks());
    }

    #[test]
    fn faulted_result_carries_message() {
        let r = TaskResult::faulted("t".into(), Utc::now(), Duration::from_millis(3), "boom");
        assert!(!r.completed);
        assert_eq!(r.fault.as_deref(), Some("boom"));

        let ok = TaskResult::completed("t".into(), Utc::now(), Duration::ZERO);
        assert!(ok.completed);
        assert!(ok.fault.is_none());
    }

    #[test]
    fn result_serializes_to_json() {
        let r = TaskResult::completed("json".into(), Utc::now(), Duration::from_millis(5));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["task_name"], "json");
        assert_eq!(v["completed"], true);
        assert!(v["fault"].is_null());
    }
}
