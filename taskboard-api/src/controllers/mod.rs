/// Request validation and business rules
///
/// Controllers sit between the HTTP routes and the store. Task operations
/// take an acquired [`StoreConn`](taskboard_shared::db::store::StoreConn);
/// auth operations take the [`Store`](taskboard_shared::db::store::Store) and
/// check connections out around password hashing. Inputs are plain values
/// (the caller's user ID comes from the auth gate, never from request-global
/// state) and the result is serializable or a [`ControllerError`].
///
/// - [`auth`]: registration and login
/// - [`tasks`]: owner-scoped task CRUD

pub mod auth;
pub mod tasks;

use taskboard_shared::{
    auth::{jwt::JwtError, password::PasswordError},
    db::store::StoreError,
};
use validator::Validate;

/// Error type for controller operations
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// Login attempted without usable credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// Unknown email or wrong password; both report the same message
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Resource doesn't exist or belongs to another user
    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    /// A blocking task panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ControllerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ControllerError::Conflict(msg),
            other => ControllerError::Store(other),
        }
    }
}

/// Longest value a `VARCHAR(255)` column accepts
pub const MAX_FIELD_CHARS: usize = 255;

/// Rejects values the database column can't hold
///
/// Counted in characters, as PostgreSQL counts `VARCHAR` length.
pub(crate) fn ensure_fits(value: &str, field: &str) -> Result<(), ControllerError> {
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(ControllerError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_FIELD_CHARS
        )));
    }
    Ok(())
}

/// Runs derived validation, reporting the first failure's message
pub(crate) fn validate_input<T: Validate>(input: &T) -> Result<(), ControllerError> {
    input.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());
        ControllerError::Validation(message)
    })
}
