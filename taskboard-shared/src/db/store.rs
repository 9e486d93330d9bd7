/// Storage seam shared by every backend
///
/// Handlers never talk to a pool directly. They acquire a [`StoreConn`] at the
/// start of a request and drop it at the end; dropping returns the underlying
/// resource (for PostgreSQL, a pooled connection) on every exit path.
///
/// # Backends
///
/// - [`PgStore`](super::postgres::PgStore): PostgreSQL through sqlx
/// - [`MemoryStore`](super::memory::MemoryStore): in-process, for tests and
///   local runs
///
/// Both honour the same contract:
/// - user emails are unique; a duplicate insert fails with [`StoreError::Conflict`]
/// - task lists are ordered newest first
/// - single-task operations are scoped by `(task_id, user_id)` and report a
///   task owned by someone else as absent
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::store::{Store, StoreError};
///
/// # async fn example(store: &dyn Store) -> Result<(), StoreError> {
/// let mut conn = store.acquire().await?;
/// let tasks = conn.list_tasks(42).await?;
/// println!("user 42 has {} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

use crate::models::{
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// PostgreSQL `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                if constraint.contains("email") {
                    StoreError::Conflict("User already exists with this email".to_string())
                } else {
                    StoreError::Conflict(format!("Constraint violation: {}", constraint))
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// A storage backend that hands out request-scoped connections
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Acquires a connection for the duration of one request
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources at shutdown
    async fn close(&self) {}
}

/// A single acquired connection
///
/// All operations are the unit of persistence used by the controllers.
#[async_trait]
pub trait StoreConn: Send {
    /// Inserts a user; fails with `Conflict` if the email is taken
    async fn create_user(&mut self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&mut self, id: i32) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError>;

    /// Lists a user's tasks, newest first
    async fn list_tasks(&mut self, user_id: i32) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&mut self, data: CreateTask) -> Result<Task, StoreError>;

    /// Owner-scoped partial update
    async fn update_task(
        &mut self,
        task_id: i32,
        user_id: i32,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError>;

    /// Owner-scoped delete; true if a task was removed
    async fn delete_task(&mut self, task_id: i32, user_id: i32) -> Result<bool, StoreError>;

    /// Owner-scoped completion flip
    async fn toggle_task(&mut self, task_id: i32, user_id: i32) -> Result<Option<Task>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
