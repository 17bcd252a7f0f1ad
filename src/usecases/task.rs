use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, NewTask, Task, TaskChanges, TaskRepository};

/// Task business operations on top of a [`TaskRepository`].
pub struct TaskUseCase {
    tasks: Arc<dyn TaskRepository>,
}

fn parse_task_id(id: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| DomainError::validation("invalid task ID format"))
}

impl TaskUseCase {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Validates `input` through the domain constructor, then persists it.
    pub async fn create_task(&self, input: NewTask) -> DomainResult<Task> {
        let task = Task::new(
            input.title,
            input.description.unwrap_or_default(),
            input.due_date,
            input.status,
        )?;
        self.tasks.create_task(&task).await
    }

    pub async fn get_task_by_id(&self, id: &str) -> DomainResult<Task> {
        let id = parse_task_id(id)?;
        self.tasks.get_task_by_id(id).await
    }

    pub async fn get_all_tasks(&self) -> DomainResult<Vec<Task>> {
        self.tasks.get_all_tasks().await
    }

    /// Merges the supplied fields into the stored task and persists the result.
    ///
    /// Order matters for callers: a malformed ID is reported before a missing
    /// task, and a missing task before any field validation.
    pub async fn update_task(&self, id: &str, changes: TaskChanges) -> DomainResult<Task> {
        let id = parse_task_id(id)?;
        let mut task = self.tasks.get_task_by_id(id).await?;
        task.apply(changes)?;
        self.tasks.update_task(id, &task).await
    }

    pub async fn delete_task(&self, id: &str) -> DomainResult<()> {
        let id = parse_task_id(id)?;
        self.tasks.delete_task(id).await
    }
}
