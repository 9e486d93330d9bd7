/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Greeting and health check endpoints
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Per-user task endpoints

pub mod auth;
pub mod health;
pub mod tasks;
