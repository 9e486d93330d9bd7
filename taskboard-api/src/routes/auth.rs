/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::{
    app::AppState,
    controllers::auth::{self, AuthSession, LoginRequest, RegisterRequest},
    error::ApiResult,
};

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "John Doe"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "user": { "id": 1, "email": "user@example.com", "name": "John Doe" },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing or overlong field, malformed body, or email
///   already taken
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let Json(req) = payload?;

    let session = auth::register(state.store.as_ref(), &state.config.auth, req).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed body
/// - `401 Unauthorized`: missing field, unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = payload?;

    let session = auth::login(state.store.as_ref(), &state.config.auth, req).await?;

    Ok(Json(session))
}
