//! # Taskboard Shared Library
//!
//! Domain types, persistence and authentication primitives used by the
//! Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: users and tasks, with their SQL
//! - `db`: storage seam, PostgreSQL and in-memory backends, pool, migrations
//! - `auth`: password hashing, JWT, bearer-token gate

pub mod auth;
pub mod db;
pub mod models;
