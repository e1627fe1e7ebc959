use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::types::TaskResult;

/// Aggregates for one scheduler run, filled in while results are drained.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Completed executions by task name.
    pub tasks_completed: HashMap<String, u64>,
    /// Faulted executions by task name.
    pub tasks_faulted: HashMap<String, u64>,
    /// Average task duration by task name.
    pub avg_task_duration: HashMap<String, Duration>,
    /// Longest single task seen.
    pub slowest: Option<(String, Duration)>,
    /// Results drained so far.
    pub results_collected: usize,
    /// Time from `start()` until the last result was drained.
    pub wall_time: Duration,
}

impl SchedulerMetrics {
    /// Record one drained result.
    pub fn record_result(&mut self, result: &TaskResult) {
        let name = result.task_name.as_str();
        let bucket = if result.completed {
            &mut self.tasks_completed
        } else {
            &mut self.tasks_faulted
        };
        *bucket.entry(name.to_string()).or_default() += 1;
        self.results_collected += 1;

        let count = self.tasks_completed.get(name).copied().unwrap_or(0)
            + self.tasks_faulted.get(name).copied().unwrap_or(0);
        let prev_avg = self
            .avg_task_duration
            .get(name)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            result.duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = result.duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
        self.avg_task_duration.insert(name.to_string(), new_avg);

        let is_slowest = self
            .slowest
            .as_ref()
            .map_or(true, |(_, d)| result.duration > *d);
        if is_slowest {
            self.slowest = Some((name.to_string(), result.duration));
        }
    }

    pub fn finish_run(&mut self, wall_time: Duration) {
        self.wall_time = wall_time;
    }

    pub fn completed_count(&self) -> u64 {
        self.tasks_completed.values().sum()
    }

    pub fn faulted_count(&self) -> u64 {
        self.tasks_faulted.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ok(name: &str, ms: u64) -> TaskResult {
        TaskResult::completed(name.to_string(), Utc::now(), Duration::from_millis(ms))
    }

    #[test]
    fn record_single_result() {
        let mut m = SchedulerMetrics::default();
        m.record_result(&ok("task", 100));

        assert_eq!(m.tasks_completed["task"], 1);
        assert_eq!(m.avg_task_duration["task"], Duration::from_millis(100));
        assert_eq!(m.results_collected, 1);
    }

    #[test]
    fn repeated_names_average() {
        let mut m = SchedulerMetrics::default();
        m.record_result(&ok("task", 100));
        m.record_result(&TaskResult::faulted(
            "task".into(),
            Utc::now(),
            Duration::from_millis(200),
            "boom",
        ));

        assert_eq!(m.completed_count(), 1);
        assert_eq!(m.faulted_count(), 1);
        let avg = m.avg_task_duration["task"].as_millis();
        assert!((140..=160).contains(&avg), "expected ~150ms, got {}ms", avg);
    }

    #[test]
    fn tracks_slowest() {
        let mut m = SchedulerMetrics::default();
        m.record_result(&ok("quick", 1));
        m.record_result(&ok("slow", 50));
        m.record_result(&ok("medium", 10));

        let (name, d) = m.slowest.clone().unwrap();
        assert_eq!(name, "slow");
        assert_eq!(d, Duration::from_millis(50));
    }

    #[test]
    fn default_metrics() {
        let m = SchedulerMetrics::default();
        assert_eq!(m.results_collected, 0);
        assert_eq!(m.wall_time, Duration::ZERO);
        assert!(m.slowest.is_none());
    }
}
