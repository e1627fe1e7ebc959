//! Fan-out task scheduler.
//!
//! A [`Scheduler`] runs a fixed batch of named closures concurrently, one
//! unit of execution per task, and blocks until every task has reported a
//! [`TaskResult`]. A panicking task is isolated: it shows up as
//! `completed = false` and never disturbs its siblings or the caller.
//!
//! ```no_run
//! use fanout_scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add_task("hello", || println!("hello")).unwrap();
//! scheduler.add_task("boom", || panic!("boom")).unwrap();
//!
//! let results = scheduler.start().unwrap();
//! assert_eq!(results.len(), 2);
//! ```

pub mod collector;
pub mod coordinator;
pub mod executor;
pub mod metrics;
pub mod registry;
pub mod runner;
pub mod task;
pub mod types;

pub use collector::{ResultCollector, ResultSender};
pub use coordinator::{CompletionCoordinator, CompletionGuard};
pub use executor::Executor;
pub use fanout_core::SchedulerConfig;
pub use metrics::SchedulerMetrics;
pub use registry::TaskRegistry;
pub use runner::Scheduler;
pub use task::{SchedulerError, Task, TaskFn};
pub use types::{SchedulerState, TaskResult};
