/// Task model and database operations
///
/// Tasks are owned by exactly one user. Every query that reads or mutates a
/// single task is scoped by both the task ID and the owner's user ID, so a
/// task belonging to someone else behaves exactly like a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i32) -> Result<(), sqlx::Error> {
/// let mut conn = pool.acquire().await?;
///
/// let task = Task::create(&mut conn, CreateTask {
///     user_id,
///     title: "Write report".to_string(),
///     description: String::new(),
/// }).await?;
///
/// // Flip completion, scoped to the owner
/// let toggled = Task::toggle_complete(&mut conn, task.id, user_id).await?;
/// assert_eq!(toggled.map(|t| t.completed), Some(true));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Generated task ID
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Short title, never empty
    pub title: String,

    /// Free-form description (empty when not given)
    pub description: String,

    /// Completion flag
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owner
    pub user_id: i32,

    /// Task title
    pub title: String,

    /// Description
    #[serde(default)]
    pub description: String,
}

/// Input for updating a task
///
/// Only `Some` fields are written. `updated_at` is refreshed regardless.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// Applies the supplied fields to an in-memory task
    pub fn apply_to(&self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = now;
    }
}

const TASK_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

impl Task {
    /// Creates a new, not yet completed task
    pub async fn create(conn: &mut PgConnection, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, title, description) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.user_id)
            .bind(data.title)
            .bind(data.description)
            .fetch_one(conn)
            .await?;

        Ok(task)
    }

    /// Lists a user's tasks, newest first
    pub async fn list_by_user(conn: &mut PgConnection, user_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await?;

        Ok(tasks)
    }

    /// Updates the supplied fields of an owned task
    ///
    /// Returns `None` if the task doesn't exist or belongs to another user.
    pub async fn update(
        conn: &mut PgConnection,
        id: i32,
        user_id: i32,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                completed = COALESCE($5, completed),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.completed)
            .fetch_optional(conn)
            .await?;

        Ok(task)
    }

    /// Flips the completion flag of an owned task
    pub async fn toggle_complete(
        conn: &mut PgConnection,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET completed = NOT completed, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await?;

        Ok(task)
    }

    /// Deletes an owned task
    ///
    /// Returns true if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
