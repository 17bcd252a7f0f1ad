use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};

/// Represents the status of a task.
///
/// `Done` is terminal: once reached, the only permitted transition is back to
/// `Done` itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    #[serde(rename = "In progress", alias = "InProgress")]
    InProgress,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Whether a task currently in `self` may move to `next`.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        match (self, next) {
            (TaskStatus::Done, TaskStatus::Done) => true,
            (TaskStatus::Done, _) => false,
            (TaskStatus::Pending | TaskStatus::InProgress, _) => true,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "In progress" | "InProgress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            other => Err(DomainError::validation(format!(
                "invalid task status '{}'",
                other
            ))),
        }
    }
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identity; `None` until the task has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "duedate")]
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
}

/// Fields supplied for a new task, before validation.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

/// A partial update. Only the `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

/// Midnight UTC of the current day. Due dates earlier than this are rejected.
pub fn start_of_today() -> DateTime<Utc> {
    Utc.from_utc_datetime(&Utc::now().date_naive().and_time(NaiveTime::MIN))
}

fn ensure_title(title: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::validation("task title cannot be empty"));
    }
    Ok(())
}

fn ensure_due_date_not_past(due_date: &DateTime<Utc>) -> DomainResult<()> {
    if *due_date < start_of_today() {
        return Err(DomainError::validation("task due date cannot be in the past"));
    }
    Ok(())
}

impl Task {
    /// Builds an unpersisted task, enforcing the creation rules.
    ///
    /// Fails with [`DomainError::ValidationFailed`] when the title is empty,
    /// the due date is missing, or the due date falls before today.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
        status: TaskStatus,
    ) -> DomainResult<Self> {
        let title = title.into();
        ensure_title(&title)?;
        let due_date =
            due_date.ok_or_else(|| DomainError::validation("task due date cannot be empty"))?;
        ensure_due_date_not_past(&due_date)?;

        Ok(Self {
            id: None,
            title,
            description: description.into(),
            due_date,
            status,
        })
    }

    /// Applies the supplied fields of `changes`, validating each independently.
    ///
    /// On error the task may be partially modified; callers discard it.
    pub fn apply(&mut self, changes: TaskChanges) -> DomainResult<()> {
        if let Some(title) = changes.title {
            ensure_title(&title)?;
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(due_date) = changes.due_date {
            ensure_due_date_not_past(&due_date)?;
            self.due_date = due_date;
        }
        if let Some(status) = changes.status {
            if !self.status.can_transition_to(status) {
                return Err(DomainError::validation(
                    "cannot change status of a completed task",
                ));
            }
            self.status = status;
        }
        Ok(())
    }
}
