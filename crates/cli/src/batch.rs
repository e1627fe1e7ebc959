use std::thread;
use std::time::Duration;

use fanout_scheduler::{Scheduler, SchedulerError};

/// Shape of a synthetic batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    pub tasks: usize,
    pub delay: Duration,
    /// Every K-th task (1-based) panics. 0 disables faults.
    pub fault_every: usize,
}

impl BatchSpec {
    pub fn task_name(index: usize) -> String {
        format!("task-{:04}", index)
    }

    pub fn is_faulting(&self, index: usize) -> bool {
        self.fault_every > 0 && (index + 1) % self.fault_every == 0
    }

    /// Register every task of the batch on `scheduler`.
    pub fn populate(&self, scheduler: &mut Scheduler) -> Result<(), SchedulerError> {
        for index in 0..self.tasks {
            let delay = self.delay;
            let faulting = self.is_faulting(index);
            scheduler.add_task(Self::task_name(index), move || {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                if faulting {
                    panic!("synthetic fault in task {}", index);
                }
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_every_third() {
        let spec = BatchSpec { tasks: 6, delay: Duration::ZERO, fault_every: 3 };
        let faulting: Vec<usize> = (0..6).filter(|&i| spec.is_faulting(i)).collect();
        assert_eq!(faulting, vec![2, 5]);
    }

    #[test]
    fn zero_disables_faults() {
        let spec = BatchSpec { tasks: 4, delay: Duration::ZERO, fault_every: 0 };
        assert!((0..4).all(|i| !spec.is_faulting(i)));
    }

    #[test]
    fn populated_batch_runs() {
        let spec = BatchSpec { tasks: 4, delay: Duration::from_millis(1), fault_every: 2 };
        let mut scheduler = Scheduler::new();
        spec.populate(&mut scheduler).unwrap();
        assert_eq!(scheduler.pending_task_names(), vec!["task-0000", "task-0001", "task-0002", "task-0003"]);

        let results = scheduler.start().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| !r.completed).count(), 2);
    }
}
