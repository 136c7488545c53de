//! In-memory task board.

use crate::types::{TaskList, TaskRecord, TaskType};

/// Tasks keyed by name.
///
/// Iteration and serialization follow name order, so "the first incomplete
/// task" is the first by name.
#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: TaskList,
}

impl TaskBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task. An existing task with the same name is replaced and
    /// starts over as not completed.
    pub fn create(&mut self, name: impl Into<String>, task_type: TaskType) {
        self.tasks.insert(name.into(), TaskRecord::new(task_type));
    }

    /// Marks a task completed in `session`, or incomplete.
    ///
    /// Completing without a session leaves the attribution empty.
    /// Returns the updated record, or `None` for an unknown task.
    pub fn update(
        &mut self,
        name: &str,
        completed: bool,
        session: Option<u32>,
    ) -> Option<&TaskRecord> {
        let record = self.tasks.get_mut(name)?;
        record.completed = completed;
        record.completed_in_session = if completed { session } else { None };
        Some(record)
    }

    /// Type of the first incomplete task.
    #[must_use]
    pub fn first_incomplete_type(&self) -> Option<TaskType> {
        self.tasks
            .values()
            .find(|record| !record.completed)
            .map(|record| record.task_type)
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_replaces_existing_task() {
        let mut board = TaskBoard::new();
        board.create("Essay", TaskType::Writing);
        board.update("Essay", true, Some(2));

        board.create("Essay", TaskType::Research);

        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks()["Essay"], TaskRecord::new(TaskType::Research));
    }

    #[test]
    fn completing_records_session_and_undo_clears_it() {
        let mut board = TaskBoard::new();
        board.create("Read Ch.1", TaskType::Reading);

        let record = board.update("Read Ch.1", true, Some(2)).unwrap();
        assert!(record.completed);
        assert_eq!(record.completed_in_session, Some(2));

        let record = board.update("Read Ch.1", false, Some(3)).unwrap();
        assert!(!record.completed);
        assert_eq!(record.completed_in_session, None);
    }

    #[test]
    fn update_unknown_task_is_none() {
        let mut board = TaskBoard::new();
        assert!(board.update("Nope", true, Some(1)).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn first_incomplete_type_follows_name_order() {
        let mut board = TaskBoard::new();
        assert_eq!(board.first_incomplete_type(), None);

        board.create("Zoology notes", TaskType::Memorization);
        board.create("Algebra", TaskType::ProblemSolving);
        assert_eq!(
            board.first_incomplete_type(),
            Some(TaskType::ProblemSolving)
        );

        board.update("Algebra", true, Some(1));
        assert_eq!(board.first_incomplete_type(), Some(TaskType::Memorization));

        board.update("Zoology notes", true, Some(1));
        assert_eq!(board.first_incomplete_type(), None);
    }
}
