/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuance and validation
/// - [`middleware`]: bearer-token gate resolving requests to a [`middleware::CurrentUser`]
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{issue_token, validate_token};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", 2)?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = issue_token(1, "user@example.com", "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.user_id, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
