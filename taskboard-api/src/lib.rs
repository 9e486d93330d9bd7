//! # Taskboard API Server Library
//!
//! This library provides the core functionality for the Taskboard API server.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and auth layer
//! - `config`: Configuration management
//! - `controllers`: Validation and business rules for auth and tasks
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request-scoped storage connection extractor
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod controllers;
pub mod error;
pub mod extract;
pub mod routes;
