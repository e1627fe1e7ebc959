use crate::task::Task;

/// Ordered, append-only list of tasks waiting to run.
///
/// Order is registration order and carries no priority: everything in the
/// registry is launched at once.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(Task::name)
    }

    /// Take every task out in registration order, leaving the registry empty.
    pub fn drain(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut registry = TaskRegistry::new();
        for name in ["c", "a", "b", "a"] {
            registry.push(Task::new(name, || {}));
        }
        assert_eq!(registry.len(), 4);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["c", "a", "b", "a"]);
    }

    #[test]
    fn drain_empties_registry() {
        let mut registry = TaskRegistry::new();
        registry.push(Task::new("only", || {}));

        let tasks = registry.drain();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name(), "only");
        assert!(registry.is_empty());
    }
}
