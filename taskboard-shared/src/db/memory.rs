/// In-process storage backend
///
/// Mirrors the PostgreSQL backend's behaviour (generated integer IDs, unique
/// emails, owner-scoped task operations, newest-first listing) without a
/// database. Used by the test suites and by local runs with
/// `DATABASE_URL=memory://`. Data is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::store::{Store, StoreConn, StoreError};
use crate::models::{
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct MemoryData {
    users: Vec<User>,
    tasks: Vec<Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl MemoryData {
    fn owned_task_mut(&mut self, task_id: i32, user_id: i32) -> Option<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
    }
}

/// Store holding all rows in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.data.lock().await.users.len()
    }

    /// Number of stored tasks across all users
    pub async fn task_count(&self) -> usize {
        self.data.lock().await.tasks.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError> {
        Ok(Box::new(MemoryConn {
            data: Arc::clone(&self.data),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Handle onto a [`MemoryStore`]
pub struct MemoryConn {
    data: Arc<Mutex<MemoryData>>,
}

#[async_trait]
impl StoreConn for MemoryConn {
    async fn create_user(&mut self, data: CreateUser) -> Result<User, StoreError> {
        let mut guard = self.data.lock().await;

        if guard.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        guard.last_user_id += 1;
        let user = User {
            id: guard.last_user_id,
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            created_at: Utc::now(),
        };
        guard.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        let guard = self.data.lock().await;
        Ok(guard.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        let guard = self.data.lock().await;
        Ok(guard.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_tasks(&mut self, user_id: i32) -> Result<Vec<Task>, StoreError> {
        let guard = self.data.lock().await;

        let mut tasks: Vec<Task> = guard
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tasks)
    }

    async fn create_task(&mut self, data: CreateTask) -> Result<Task, StoreError> {
        let mut guard = self.data.lock().await;

        // Same guarantee as the foreign key on tasks.user_id
        if !guard.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::Conflict(format!(
                "Constraint violation: unknown user {}",
                data.user_id
            )));
        }

        guard.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: guard.last_task_id,
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        guard.tasks.push(task.clone());

        Ok(task)
    }

    async fn update_task(
        &mut self,
        task_id: i32,
        user_id: i32,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut guard = self.data.lock().await;

        Ok(guard.owned_task_mut(task_id, user_id).map(|task| {
            data.apply_to(task, Utc::now());
            task.clone()
        }))
    }

    async fn delete_task(&mut self, task_id: i32, user_id: i32) -> Result<bool, StoreError> {
        let mut guard = self.data.lock().await;

        let before = guard.tasks.len();
        guard
            .tasks
            .retain(|t| !(t.id == task_id && t.user_id == user_id));

        Ok(guard.tasks.len() < before)
    }

    async fn toggle_task(&mut self, task_id: i32, user_id: i32) -> Result<Option<Task>, StoreError> {
        let mut guard = self.data.lock().await;

        Ok(guard.owned_task_mut(task_id, user_id).map(|task| {
            task.completed = !task.completed;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }
}
