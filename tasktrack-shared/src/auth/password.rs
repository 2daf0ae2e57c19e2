/// Password hashing using Argon2id
///
/// Passwords are hashed with Argon2id and stored in PHC string format.
/// The parameters are embedded in the hash, so verification works across
/// parameter changes.
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
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

/// Hashes a password using Argon2id
///
/// # Security Parameters
///
/// - Memory: 64 MB (65536 KB)
/// - Iterations: 3 passes
/// - Parallelism: 4 lanes
/// - Salt: 16 bytes from the OS RNG
///
/// # Returns
///
/// PHC string format hash, e.g.
/// `$argon2id$v=19$m=65536,t=3,p=4$...$...`
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
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
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be
/// parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Validates password strength
///
/// Requires at least 8 characters with an uppercase letter, a lowercase
/// letter, and a digit.
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("Passw0rd").is_ok());
/// assert!(validate_password_strength("short1A").is_err());
/// assert!(validate_password_strength("password1").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let password = "correct_password";
        let hash = hash_password(password).expect("Hash should succeed");

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = verify_password("password", "not-a-valid-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("Passw0rd").is_ok());
        assert!(validate_password_strength("Sh0rt").is_err());
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }
}
