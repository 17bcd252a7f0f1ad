//! PostgreSQL storage engine built on `sqlx`.
//!
//! Each task and user is one row keyed by a database-generated UUID. Updates
//! and deletes are single statements, so the database's row-level atomicity is
//! the only concurrency control.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Task, TaskRepository, User, UserRepository};

/// Opens a connection pool to `database_url`.
pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

const TASK_COLUMNS: &str = "id, title, description, due_date, status";
const USER_COLUMNS: &str = "id, username, password_hash, role";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    status: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            DomainError::Storage(format!("task {} has unknown status '{}'", row.id, row.status))
        })?;
        Ok(Task {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            status,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|_| {
            DomainError::Storage(format!("user {} has unknown role '{}'", row.id, row.role))
        })?;
        Ok(User {
            id: Some(row.id),
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

/// Task repository backed by the `tasks` table.
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create_task(&self, task: &Task) -> DomainResult<Task> {
        let sql = format!(
            "INSERT INTO tasks (title, description, due_date, status) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to insert task: {}", e)))?;
        row.try_into()
    }

    async fn get_task_by_id(&self, id: Uuid) -> DomainResult<Task> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to find task {}: {}", id, e)))?
            .ok_or(DomainError::TaskNotFound)?
            .try_into()
    }

    async fn get_all_tasks(&self) -> DomainResult<Vec<Task>> {
        let sql = format!("SELECT {} FROM tasks ORDER BY due_date, id", TASK_COLUMNS);
        sqlx::query_as::<_, TaskRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to list tasks: {}", e)))?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn update_task(&self, id: Uuid, task: &Task) -> DomainResult<Task> {
        let sql = format!(
            "UPDATE tasks SET title = $2, description = $3, due_date = $4, status = $5 \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to update task {}: {}", id, e)))?
            .ok_or(DomainError::TaskNotFound)?
            .try_into()
    }

    async fn delete_task(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to delete task {}: {}", id, e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound);
        }
        Ok(())
    }
}

/// User repository backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: &User) -> DomainResult<User> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::UsernameTaken,
                other => DomainError::storage(format!("failed to insert user: {}", other)),
            })?;
        row.try_into()
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("failed to find user '{}': {}", username, e))
            })?
            .ok_or(DomainError::UserNotFound)?
            .try_into()
    }
}
