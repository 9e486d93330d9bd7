/// Task endpoints
///
/// All routes here sit behind the JWT auth layer, which puts the caller's
/// [`CurrentUser`] into request extensions.
///
/// # Endpoints
///
/// - `GET    /api/tasks`             - List the caller's tasks
/// - `POST   /api/tasks`             - Create a task
/// - `PUT    /api/tasks/:id`         - Update a task
/// - `DELETE /api/tasks/:id`         - Delete a task
/// - `PATCH  /api/tasks/:id/toggle`  - Flip completion

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    Extension, Json,
};
use taskboard_shared::auth::middleware::CurrentUser;

use crate::{
    controllers::tasks::{
        self, CreateTaskRequest, DeleteConfirmation, TaskEnvelope, TaskList, UpdateTaskRequest,
    },
    error::ApiResult,
    extract::DbConn,
};

/// `GET /api/tasks`
pub async fn list_tasks(
    Extension(user): Extension<CurrentUser>,
    mut conn: DbConn,
) -> ApiResult<Json<TaskList>> {
    Ok(Json(tasks::get_user_tasks(&mut *conn, user.id).await?))
}

/// `POST /api/tasks`
///
/// ```text
/// { "title": "Write report", "description": "Q3 numbers" }
/// ```
///
/// Returns 201 with `{ "success": true, "task": {...} }`, or 400 when the
/// title is missing or empty.
pub async fn create_task(
    Extension(user): Extension<CurrentUser>,
    mut conn: DbConn,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskEnvelope>)> {
    let Json(req) = payload?;

    let created = tasks::create_task(&mut *conn, user.id, req).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/tasks/:id`
///
/// `title` is required; `description` and `completed` are optional.
pub async fn update_task(
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i32>, PathRejection>,
    mut conn: DbConn,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let Path(task_id) = task_id?;
    let Json(req) = payload?;

    Ok(Json(tasks::update_task(&mut *conn, task_id, user.id, req).await?))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i32>, PathRejection>,
    mut conn: DbConn,
) -> ApiResult<Json<DeleteConfirmation>> {
    let Path(task_id) = task_id?;

    Ok(Json(tasks::delete_task(&mut *conn, task_id, user.id).await?))
}

/// `PATCH /api/tasks/:id/toggle`
pub async fn toggle_task(
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i32>, PathRejection>,
    mut conn: DbConn,
) -> ApiResult<Json<TaskEnvelope>> {
    let Path(task_id) = task_id?;

    Ok(Json(tasks::toggle_task_complete(&mut *conn, task_id, user.id).await?))
}
