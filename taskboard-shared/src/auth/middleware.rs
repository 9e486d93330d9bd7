/// Authentication gate for protected routes
///
/// Turns an `Authorization: Bearer <token>` header into a [`CurrentUser`]:
///
/// 1. Extract the bearer token ([`bearer_token`])
/// 2. Validate signature and expiry against the shared secret
/// 3. Resolve the embedded user ID to a stored user
///
/// The resulting `CurrentUser` is handed to handlers, which pass it
/// explicitly to the controllers. Nothing is stashed in request-global state
/// beyond the request's own extensions.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use taskboard_shared::auth::middleware::{authenticate, bearer_token, AuthError};
/// use taskboard_shared::db::store::Store;
///
/// # async fn example(store: &dyn Store, headers: &HeaderMap) -> Result<(), AuthError> {
/// let token = bearer_token(headers)?;
/// let mut conn = store.acquire().await.map_err(AuthError::Store)?;
/// let user = authenticate(conn.as_mut(), token, "jwt-secret").await?;
/// println!("Hello, {}", user.name);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::jwt::{validate_token, JwtError};
use crate::db::store::{StoreConn, StoreError};
use crate::models::user::User;

/// Identity of the authenticated caller
///
/// Inserted into request extensions by the API's auth layer; handlers take it
/// with `Extension<CurrentUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Error type for the authentication gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer token in the request
    #[error("Authentication required")]
    MissingCredentials,

    /// Token signature was valid but `exp` has passed
    #[error("Token has expired")]
    TokenExpired,

    /// Token could not be decoded or verified
    #[error("Invalid token")]
    InvalidToken,

    /// Token names a user that no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Storage failed during user lookup
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// A missing header, a non-Bearer scheme, and an empty token are all treated
/// as missing credentials.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Validates a token and resolves it to a stored user
///
/// # Errors
///
/// - `TokenExpired` / `InvalidToken` from token validation
/// - `UserNotFound` if the user ID in the token has no row
/// - `Store` if the lookup itself fails
pub async fn authenticate(
    conn: &mut dyn StoreConn,
    token: &str,
    secret: &str,
) -> Result<CurrentUser, AuthError> {
    let claims = validate_token(token, secret).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        AuthError::from(e)
    })?;

    let user = conn
        .find_user_by_id(claims.user_id)
        .await
        .map_err(AuthError::Store)?
        .ok_or_else(|| {
            debug!(user_id = claims.user_id, "Token references unknown user");
            AuthError::UserNotFound
        })?;

    Ok(CurrentUser::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, issue_token, Claims};
    use crate::db::memory::MemoryStore;
    use crate::db::store::Store;
    use crate::models::user::CreateUser;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");

        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwYXNz")),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let store = MemoryStore::new();
        let mut conn = store.acquire().await.unwrap();
        let user = conn
            .create_user(CreateUser {
                email: "gate@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Gate".to_string(),
            })
            .await
            .unwrap();

        let token = issue_token(user.id, &user.email, SECRET).unwrap();
        let current = authenticate(conn.as_mut(), &token, SECRET).await.unwrap();

        assert_eq!(current.id, user.id);
        assert_eq!(current.email, "gate@example.com");
    }

    #[tokio::test]
    async fn test_authenticate_rejections() {
        let store = MemoryStore::new();
        let mut conn = store.acquire().await.unwrap();

        let unknown = issue_token(404, "ghost@example.com", SECRET).unwrap();
        assert!(matches!(
            authenticate(conn.as_mut(), &unknown, SECRET).await,
            Err(AuthError::UserNotFound)
        ));

        let expired = create_token(
            &Claims::with_expiration(1, "a@example.com", Duration::seconds(-60)),
            SECRET,
        )
        .unwrap();
        assert!(matches!(
            authenticate(conn.as_mut(), &expired, SECRET).await,
            Err(AuthError::TokenExpired)
        ));

        assert!(matches!(
            authenticate(conn.as_mut(), "garbage", SECRET).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::MissingCredentials.to_string(), "Authentication required");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token has expired");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
    }
}
