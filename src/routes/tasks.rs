use crate::{
    auth::AuthenticatedUser,
    domain::{NewTask, TaskChanges, TaskStatus},
    error::AppError,
    usecases::TaskUseCase,
};
use actix_web::{delete, post, put, route, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Payload for creating a task.
///
/// Presence of `title` and `duedate` is checked by the domain so that the
/// error messages match the ones returned on update.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(rename = "duedate")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            status: req.status,
        }
    }
}

/// Payload for a partial update. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(rename = "duedate")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            status: req.status,
        }
    }
}

/// Retrieves every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks, ordered by due date.
/// - `401 Unauthorized`: Missing or invalid token.
#[route("", method = "GET", method = "HEAD")]
pub async fn get_tasks(
    tasks: web::Data<TaskUseCase>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let all = tasks.get_all_tasks().await?;
    log::debug!("User '{}' listed {} tasks", user.username(), all.len());
    Ok(HttpResponse::Ok().json(all))
}

/// Retrieves a single task by its ID.
///
/// ## Responses:
/// - `200 OK`: The task.
/// - `400 Bad Request`: The ID is not a valid task ID.
/// - `404 Not Found`: No task has this ID.
#[route("/{id}", method = "GET", method = "HEAD")]
pub async fn get_task(
    tasks: web::Data<TaskUseCase>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task_by_id(&task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task. Admin only.
///
/// ## Responses:
/// - `201 Created`: The stored task, including its new ID.
/// - `400 Bad Request`: Empty title, missing or past due date, or malformed body.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskUseCase>,
    user: AuthenticatedUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create_task(task_data.into_inner().into()).await?;
    log::info!("User '{}' created task {:?}", user.username(), task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Applies a partial update to a task. Admin only.
///
/// A task already `Done` cannot be moved to another status.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskUseCase>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .update_task(&task_id, task_data.into_inner().into())
        .await?;
    log::info!("User '{}' updated task {}", user.username(), task_id);

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Admin only.
///
/// ## Responses:
/// - `204 No Content`: The task was deleted.
/// - `404 Not Found`: No task has this ID.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskUseCase>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&task_id).await?;
    log::info!("User '{}' deleted task {}", user.username(), task_id);

    Ok(HttpResponse::NoContent().finish())
}
