/// Password hashing module using Argon2id
///
/// Hashes are salted with 16 random bytes and stored in PHC string format,
/// which embeds the algorithm, parameters and salt. The time cost is the
/// tunable work factor; memory and parallelism are fixed.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 19 MiB (19456 KiB)
/// - **Iterations**: `cost` (default [`DEFAULT_COST`])
/// - **Parallelism**: 1 lane
/// - **Output**: 32-byte hash
///
/// Verification reads the parameters back from the stored hash, so raising
/// the cost never invalidates existing passwords.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123", 2)?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Default work factor
pub const DEFAULT_COST: u32 = 12;

/// Memory cost in KiB
const MEMORY_COST_KIB: u32 = 19456;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if `cost` is zero or hashing fails.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(cost)
        .p_cost(1)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time.
///
/// Returns `Ok(false)` for a wrong password and an error only when the stored
/// hash itself can't be parsed or used.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // A PHC string can parse without carrying any hash output
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Missing hash output".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the suite fast; the format is the same at any cost.
    const TEST_COST: u32 = 1;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("test_password_123", TEST_COST).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_cost_is_recorded_in_hash() {
        let hash = hash_password("pw", 3).expect("Hash should succeed");
        assert!(hash.contains("t=3"));
    }

    #[test]
    fn test_zero_cost_is_rejected() {
        let result = hash_password("pw", 0);
        assert!(matches!(result, Err(PasswordError::HashError(_))));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password", TEST_COST).unwrap();
        let hash2 = hash_password("same_password", TEST_COST).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let hash = hash_password("correct_password", TEST_COST).unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_truncated_hash_is_an_error_not_a_mismatch() {
        let hash = hash_password("password", TEST_COST).unwrap();
        let without_output = &hash[..hash.rfind('$').unwrap()];

        assert!(matches!(
            verify_password("password", without_output),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_unicode_password_verifies() {
        let password = "unicode-密码-パスワード";
        let hash = hash_password(password, TEST_COST).unwrap();

        assert!(verify_password(password, &hash).unwrap());
    }
}
