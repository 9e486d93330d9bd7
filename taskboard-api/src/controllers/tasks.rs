/// Owner-scoped task operations
///
/// Every operation takes the caller's user ID. Lookups by task ID are always
/// paired with it, so a task belonging to someone else is reported exactly
/// like a missing one.

use serde::{Deserialize, Serialize};
use taskboard_shared::{
    db::store::StoreConn,
    models::task::{CreateTask, Task, UpdateTask},
};
use tracing::debug;
use validator::Validate;

use super::{ensure_fits, validate_input, ControllerError};

const TASK_NOT_FOUND: &str = "Task not found";

/// Create task request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,

    pub description: Option<String>,
}

/// Update task request
///
/// `title` is mandatory; `description` and `completed` are written only when
/// present.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,

    pub description: Option<String>,

    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub success: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub success: bool,
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub success: bool,
    pub message: String,
}

impl TaskEnvelope {
    fn new(task: Task) -> Self {
        Self {
            success: true,
            task,
        }
    }
}

fn not_found() -> ControllerError {
    ControllerError::NotFound(TASK_NOT_FOUND.to_string())
}

/// Lists the caller's tasks, newest first
pub async fn get_user_tasks(conn: &mut dyn StoreConn, user_id: i32) -> Result<TaskList, ControllerError> {
    let tasks = conn.list_tasks(user_id).await?;

    Ok(TaskList {
        success: true,
        tasks,
    })
}

/// Creates a task owned by the caller
///
/// # Errors
///
/// `Validation` if the title is missing, empty, or longer than
/// [`MAX_FIELD_CHARS`](super::MAX_FIELD_CHARS); nothing is written.
pub async fn create_task(
    conn: &mut dyn StoreConn,
    user_id: i32,
    req: CreateTaskRequest,
) -> Result<TaskEnvelope, ControllerError> {
    validate_input(&req)?;

    let Some(title) = req.title else {
        return Err(ControllerError::Validation("Title is required".to_string()));
    };
    ensure_fits(&title, "Title")?;

    let task = conn
        .create_task(CreateTask {
            user_id,
            title,
            description: req.description.unwrap_or_default(),
        })
        .await?;

    debug!(task_id = task.id, user_id, "Task created");

    Ok(TaskEnvelope::new(task))
}

/// Updates one of the caller's tasks
///
/// Validation runs before the lookup, so an invalid request never writes.
///
/// # Errors
///
/// - `Validation` if the title is missing, empty, or too long
/// - `NotFound` if the task doesn't exist or isn't the caller's
pub async fn update_task(
    conn: &mut dyn StoreConn,
    task_id: i32,
    user_id: i32,
    req: UpdateTaskRequest,
) -> Result<TaskEnvelope, ControllerError> {
    validate_input(&req)?;

    let UpdateTaskRequest {
        title: Some(title),
        description,
        completed,
    } = req
    else {
        return Err(ControllerError::Validation("Title is required".to_string()));
    };
    ensure_fits(&title, "Title")?;

    let changes = UpdateTask {
        title: Some(title),
        description,
        completed,
    };

    conn.update_task(task_id, user_id, changes)
        .await?
        .map(TaskEnvelope::new)
        .ok_or_else(not_found)
}

/// Deletes one of the caller's tasks
///
/// # Errors
///
/// `NotFound` if the task doesn't exist or isn't the caller's.
pub async fn delete_task(
    conn: &mut dyn StoreConn,
    task_id: i32,
    user_id: i32,
) -> Result<DeleteConfirmation, ControllerError> {
    if !conn.delete_task(task_id, user_id).await? {
        return Err(not_found());
    }

    debug!(task_id, user_id, "Task deleted");

    Ok(DeleteConfirmation {
        success: true,
        message: "Task deleted successfully".to_string(),
    })
}

/// Flips the completion flag of one of the caller's tasks
///
/// # Errors
///
/// `NotFound` if the task doesn't exist or isn't the caller's.
pub async fn toggle_task_complete(
    conn: &mut dyn StoreConn,
    task_id: i32,
    user_id: i32,
) -> Result<TaskEnvelope, ControllerError> {
    conn.toggle_task(task_id, user_id)
        .await?
        .map(TaskEnvelope::new)
        .ok_or_else(not_found)
}
