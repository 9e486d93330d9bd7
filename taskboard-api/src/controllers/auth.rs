/// Registration and login
///
/// Both operations end by issuing a 7-day HS256 token for the account and
/// returning an [`AuthSession`].
///
/// Password hashing is slow on purpose, so these operations take the
/// [`Store`] itself and hold a connection only for each lookup or insert,
/// never while a hash is being computed.

use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    db::store::Store,
    models::user::{CreateUser, User, UserProfile},
};
use tracing::{debug, info};
use validator::Validate;

use super::{ensure_fits, validate_input, ControllerError};
use crate::config::AuthConfig;

/// Register request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Email, password, and name are required"),
        length(min = 1, message = "Email, password, and name are required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Email, password, and name are required"),
        length(min = 1, message = "Email, password, and name are required")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "Email, password, and name are required"),
        length(min = 1, message = "Email, password, and name are required")
    )]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email and password are required"),
        length(min = 1, message = "Email and password are required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Email and password are required"),
        length(min = 1, message = "Email and password are required")
    )]
    pub password: Option<String>,
}

/// Successful register/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub success: bool,
    pub user: UserProfile,
    pub token: String,
}

impl AuthSession {
    fn issue(user: &User, secret: &str) -> Result<Self, ControllerError> {
        let token = jwt::issue_token(user.id, &user.email, secret)?;

        Ok(Self {
            success: true,
            user: UserProfile::from(user),
            token,
        })
    }
}

/// Creates an account and signs the caller in
///
/// # Errors
///
/// - `Validation` if any field is missing or empty, or email/name exceed
///   [`MAX_FIELD_CHARS`](super::MAX_FIELD_CHARS)
/// - `Conflict` if the email is already registered
pub async fn register(
    store: &dyn Store,
    settings: &AuthConfig,
    req: RegisterRequest,
) -> Result<AuthSession, ControllerError> {
    validate_input(&req)?;

    let RegisterRequest {
        email: Some(email),
        password: Some(password),
        name: Some(name),
    } = req
    else {
        return Err(ControllerError::Validation(
            "Email, password, and name are required".to_string(),
        ));
    };

    ensure_fits(&email, "Email")?;
    ensure_fits(&name, "Name")?;

    let taken = {
        let mut conn = store.acquire().await?;
        conn.find_user_by_email(&email).await?.is_some()
    };

    if taken {
        debug!(email = %email, "Registration rejected: email taken");
        return Err(ControllerError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = hash_blocking(password, settings.password_cost).await?;

    // The unique constraint backstops a concurrent registration racing the
    // check above; it surfaces as the same Conflict.
    let user = {
        let mut conn = store.acquire().await?;
        conn.create_user(CreateUser {
            email,
            password_hash,
            name,
        })
        .await?
    };

    info!(user_id = user.id, "User registered");

    AuthSession::issue(&user, &settings.jwt_secret)
}

/// Verifies credentials and issues a token
///
/// # Errors
///
/// - `Unauthenticated` if email or password is missing or empty
/// - `InvalidCredentials` for an unknown email or a wrong password
pub async fn login(
    store: &dyn Store,
    settings: &AuthConfig,
    req: LoginRequest,
) -> Result<AuthSession, ControllerError> {
    let missing =
        || ControllerError::Unauthenticated("Email and password are required".to_string());

    validate_input(&req).map_err(|_| missing())?;

    let LoginRequest {
        email: Some(email),
        password: Some(password),
    } = req
    else {
        return Err(missing());
    };

    let found = {
        let mut conn = store.acquire().await?;
        conn.find_user_by_email(&email).await?
    };

    let Some(user) = found else {
        debug!("Login rejected: unknown email");
        return Err(ControllerError::InvalidCredentials);
    };

    if !verify_blocking(password, user.password_hash.clone()).await? {
        debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(ControllerError::InvalidCredentials);
    }

    AuthSession::issue(&user, &settings.jwt_secret)
}

async fn hash_blocking(password: String, cost: u32) -> Result<String, ControllerError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password, cost))
        .await
        .map_err(|e| ControllerError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(ControllerError::from)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, ControllerError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| ControllerError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(ControllerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::MAX_FIELD_CHARS;
    use axum::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use taskboard_shared::{
        db::{
            memory::MemoryStore,
            store::{StoreConn, StoreError},
        },
        models::task::{CreateTask, Task, UpdateTask},
    };

    fn settings() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            password_cost: 1,
        }
    }

    fn register_req(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            name: Some(name.to_string()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    /// A store with room for exactly one open connection
    struct SingleConnStore {
        inner: MemoryStore,
        live: Arc<AtomicUsize>,
    }

    struct TrackedConn {
        inner: Box<dyn StoreConn>,
        live: Arc<AtomicUsize>,
    }

    impl Drop for TrackedConn {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Store for SingleConnStore {
        async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError> {
            if self
                .live
                .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(StoreError::Unavailable("pool exhausted".to_string()));
            }

            let inner = match self.inner.acquire().await {
                Ok(conn) => conn,
                Err(err) => {
                    self.live.fetch_sub(1, Ordering::SeqCst);
                    return Err(err);
                }
            };

            Ok(Box::new(TrackedConn {
                inner,
                live: Arc::clone(&self.live),
            }))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[async_trait]
    impl StoreConn for TrackedConn {
        async fn create_user(&mut self, data: CreateUser) -> Result<User, StoreError> {
            self.inner.create_user(data).await
        }

        async fn find_user_by_id(&mut self, id: i32) -> Result<Option<User>, StoreError> {
            self.inner.find_user_by_id(id).await
        }

        async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
            self.inner.find_user_by_email(email).await
        }

        async fn list_tasks(&mut self, user_id: i32) -> Result<Vec<Task>, StoreError> {
            self.inner.list_tasks(user_id).await
        }

        async fn create_task(&mut self, data: CreateTask) -> Result<Task, StoreError> {
            self.inner.create_task(data).await
        }

        async fn update_task(
            &mut self,
            task_id: i32,
            user_id: i32,
            data: UpdateTask,
        ) -> Result<Option<Task>, StoreError> {
            self.inner.update_task(task_id, user_id, data).await
        }

        async fn delete_task(&mut self, task_id: i32, user_id: i32) -> Result<bool, StoreError> {
            self.inner.delete_task(task_id, user_id).await
        }

        async fn toggle_task(&mut self, task_id: i32, user_id: i32) -> Result<Option<Task>, StoreError> {
            self.inner.toggle_task(task_id, user_id).await
        }
    }

    #[tokio::test]
    async fn test_register_returns_session() {
        let store = MemoryStore::new();

        let session = register(&store, &settings(), register_req("a@example.com", "pw", "Alice"))
            .await
            .unwrap();

        assert!(session.success);
        assert_eq!(session.user.email, "a@example.com");
        assert_eq!(session.user.name, "Alice");

        let claims = jwt::validate_token(&session.token, &settings().jwt_secret).unwrap();
        assert_eq!(claims.user_id, session.user.id);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryStore::new();

        register(&store, &settings(), register_req("a@example.com", "plain-pw", "Alice"))
            .await
            .unwrap();

        let mut conn = store.acquire().await.unwrap();
        let user = conn.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "plain-pw");
        assert!(password::verify_password("plain-pw", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_creates_no_second_record() {
        let store = MemoryStore::new();

        register(&store, &settings(), register_req("dup@example.com", "pw", "First"))
            .await
            .unwrap();
        let err = register(&store, &settings(), register_req("dup@example.com", "other", "Second"))
            .await
            .unwrap_err();

        assert!(matches!(err, ControllerError::Conflict(_)));
        assert_eq!(err.to_string(), "User already exists with this email");
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_requires_every_field() {
        let store = MemoryStore::new();

        let missing_name = RegisterRequest {
            name: None,
            ..register_req("a@example.com", "pw", "")
        };
        let err = register(&store, &settings(), missing_name).await.unwrap_err();
        assert_eq!(err.to_string(), "Email, password, and name are required");

        let empty_password = register_req("a@example.com", "", "Alice");
        let err = register(&store, &settings(), empty_password).await.unwrap_err();
        assert!(matches!(err, ControllerError::Validation(_)));

        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_rejects_values_too_long_to_store() {
        let store = MemoryStore::new();

        let long_name = "n".repeat(MAX_FIELD_CHARS + 1);
        let err = register(&store, &settings(), register_req("a@example.com", "pw", &long_name))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Validation(_)));
        assert_eq!(err.to_string(), "Name must be at most 255 characters");

        let long_email = format!("{}@example.com", "e".repeat(MAX_FIELD_CHARS));
        let err = register(&store, &settings(), register_req(&long_email, "pw", "Alice"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email must be at most 255 characters");

        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_no_connection_is_held_while_hashing() {
        let live = Arc::new(AtomicUsize::new(0));
        let store = SingleConnStore {
            inner: MemoryStore::new(),
            live: Arc::clone(&live),
        };

        // Every step must release its connection before the next acquire,
        // otherwise a one-connection store reports itself exhausted.
        register(&store, &settings(), register_req("solo@example.com", "pw", "Solo"))
            .await
            .unwrap();
        login(&store, &settings(), login_req("solo@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(live.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_login_token_expires_in_seven_days() {
        let store = MemoryStore::new();

        let registered = register(&store, &settings(), register_req("b@example.com", "pw", "Bob"))
            .await
            .unwrap();
        let session = login(&store, &settings(), login_req("b@example.com", "pw"))
            .await
            .unwrap();

        let claims = jwt::validate_token(&session.token, &settings().jwt_secret).unwrap();
        assert_eq!(claims.user_id, registered.user.id);
        assert_eq!(claims.email, "b@example.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_does_not_reveal_which_part_failed() {
        let store = MemoryStore::new();

        register(&store, &settings(), register_req("c@example.com", "right", "Carol"))
            .await
            .unwrap();

        let wrong_password = login(&store, &settings(), login_req("c@example.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = login(&store, &settings(), login_req("nobody@example.com", "right"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), "Invalid email or password");
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let store = MemoryStore::new();

        let err = login(&store, &settings(), LoginRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Unauthenticated(_)));
        assert_eq!(err.to_string(), "Email and password are required");

        let err = login(&store, &settings(), login_req("a@example.com", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Unauthenticated(_)));
    }
}
