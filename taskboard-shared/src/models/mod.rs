/// Database models for Taskboard
///
/// Each model owns the SQL for its table. Higher layers reach them through
/// the storage seam in [`crate::db::store`] rather than calling these
/// functions directly.
///
/// # Models
///
/// - `user`: accounts and credentials
/// - `task`: per-user tasks

pub mod task;
pub mod user;
