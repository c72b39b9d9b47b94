/// Secret hashing and the password policy applied at registration.
///
/// Secrets are hashed with Argon2id (64 MB memory, 3 passes, 4 lanes, 32-byte
/// output, 16-byte random salt) and stored in PHC string form, so the
/// parameters travel with the hash and verification needs no configuration.
///
/// # Example
///
/// ```
/// use contentpulse_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Editorial2024")?;
/// assert!(verify_password("Editorial2024", &hash)?);
/// assert!(!verify_password("editorial2024", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

use super::account::ValidationError;

/// Minimum secret length, counted in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes `password` with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the Argon2 parameters are rejected or
/// hashing fails.
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

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash in constant time.
///
/// A mismatch is `Ok(false)`; only a corrupt hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Applies the registration password policy.
///
/// Rules are checked in a fixed order and the first failure is reported:
/// length, then an uppercase letter, a lowercase letter, and a digit.
///
/// ```
/// use contentpulse_shared::auth::account::ValidationError;
/// use contentpulse_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("Planning1").is_ok());
/// assert_eq!(validate_password_strength("Plan1"), Err(ValidationError::TooShort));
/// assert_eq!(validate_password_strength("planning1"), Err(ValidationError::MissingUppercase));
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort);
    }

    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::MissingUppercase);
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::MissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::MissingDigit);
    }

    Ok(())
}
