//! In-memory storage engine, used by tests and by local runs without a
//! database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Task, TaskRepository, User, UserRepository};

/// Thread-safe in-memory task store keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create_task(&self, task: &Task) -> DomainResult<Task> {
        let id = Uuid::new_v4();
        let stored = Task {
            id: Some(id),
            ..task.clone()
        };
        self.tasks.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_task_by_id(&self, id: Uuid) -> DomainResult<Task> {
        self.tasks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DomainError::TaskNotFound)
    }

    async fn get_all_tasks(&self) -> DomainResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, task: &Task) -> DomainResult<Task> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks.get_mut(&id).ok_or(DomainError::TaskNotFound)?;
        *slot = Task {
            id: Some(id),
            ..task.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_task(&self, id: Uuid) -> DomainResult<()> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::TaskNotFound)
    }
}

/// Thread-safe in-memory user store. Usernames are the unique key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> DomainResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(DomainError::UsernameTaken);
        }
        let stored = User {
            id: Some(Uuid::new_v4()),
            ..user.clone()
        };
        users.insert(stored.username.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, TaskStatus};
    use chrono::{Duration, Utc};

    fn sample_task(title: &str) -> Task {
        Task::new(
            title,
            "",
            Some(Utc::now() + Duration::days(2)),
            TaskStatus::Pending,
        )
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_task_crud() {
        let repo = InMemoryTaskRepository::new();

        let created = repo.create_task(&sample_task("Pay bills")).await.unwrap();
        let id = created.id.expect("store assigns an id");

        let fetched = repo.get_task_by_id(id).await.unwrap();
        assert_eq!(fetched, created);

        let mut changed = fetched.clone();
        changed.status = TaskStatus::Done;
        let updated = repo.update_task(id, &changed).await.unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.id, Some(id));

        assert_eq!(repo.get_all_tasks().await.unwrap().len(), 1);

        repo.delete_task(id).await.unwrap();
        assert_eq!(
            repo.get_task_by_id(id).await.unwrap_err(),
            DomainError::TaskNotFound
        );
        assert_eq!(
            repo.delete_task(id).await.unwrap_err(),
            DomainError::TaskNotFound
        );
    }

    #[actix_rt::test]
    async fn test_update_missing_task() {
        let repo = InMemoryTaskRepository::new();
        let err = repo
            .update_task(Uuid::new_v4(), &sample_task("Ghost"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::TaskNotFound);
        assert!(repo.get_all_tasks().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_usernames_are_unique() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice", "hash").unwrap();

        let created = repo.create_user(&user).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.role, Role::User);

        assert_eq!(
            repo.create_user(&user).await.unwrap_err(),
            DomainError::UsernameTaken
        );
        assert_eq!(
            repo.get_user_by_username("alice").await.unwrap().password_hash,
            "hash"
        );
        assert_eq!(
            repo.get_user_by_username("bob").await.unwrap_err(),
            DomainError::UserNotFound
        );
    }
}
