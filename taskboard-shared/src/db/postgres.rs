/// PostgreSQL storage backend
///
/// Wraps a sqlx pool. Each [`acquire`](Store::acquire) checks out one pooled
/// connection which goes back to the pool when the returned [`PgConn`] is
/// dropped.

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, PgPool, Postgres};

use super::{
    pool::{close_pool, health_check},
    store::{Store, StoreConn, StoreError},
};
use crate::models::{
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and diagnostics
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgConn { conn }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        close_pool(&self.pool).await;
    }
}

/// One pooled PostgreSQL connection
pub struct PgConn {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreConn for PgConn {
    async fn create_user(&mut self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&mut self.conn, data).await?)
    }

    async fn find_user_by_id(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&mut self.conn, id).await?)
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&mut self.conn, email).await?)
    }

    async fn list_tasks(&mut self, user_id: i32) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_user(&mut self.conn, user_id).await?)
    }

    async fn create_task(&mut self, data: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&mut self.conn, data).await?)
    }

    async fn update_task(
        &mut self,
        task_id: i32,
        user_id: i32,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&mut self.conn, task_id, user_id, data).await?)
    }

    async fn delete_task(&mut self, task_id: i32, user_id: i32) -> Result<bool, StoreError> {
        Ok(Task::delete(&mut self.conn, task_id, user_id).await?)
    }

    async fn toggle_task(&mut self, task_id: i32, user_id: i32) -> Result<Option<Task>, StoreError> {
        Ok(Task::toggle_complete(&mut self.conn, task_id, user_id).await?)
    }
}
