/// JWT token generation and validation module
///
/// Tokens are signed with HS256 using a shared secret and carry the user's ID
/// and email. Every token is valid for exactly [`TOKEN_TTL_DAYS`] days from
/// issue; there is no refresh flow.
///
/// # Claims
///
/// ```json
/// { "userId": 42, "email": "user@example.com", "iat": 1700000000, "exp": 1700604800 }
/// ```
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "user@example.com");
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.user_id, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of every issued token
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Bad signature, malformed token, or missing claims
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user
    #[serde(rename = "userId")]
    pub user_id: i32,

    /// Email at time of issue (informational)
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring [`TOKEN_TTL_DAYS`] days from now
    pub fn new(user_id: i32, email: impl Into<String>) -> Self {
        Self::with_expiration(user_id, email, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration produces an already-expired token, which is
    /// handy in tests.
    pub fn with_expiration(user_id: i32, email: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            user_id,
            email: email.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh token for a user
pub fn issue_token(user_id: i32, email: &str, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, email), secret)
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature and the `exp` claim with zero leeway.
///
/// # Errors
///
/// - `JwtError::Expired` if `exp` is in the past
/// - `JwtError::Invalid` for anything else (bad signature, garbage input,
///   missing claims, other algorithm)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}
