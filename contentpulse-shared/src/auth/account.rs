/// Registration and login.
///
/// ```no_run
/// use contentpulse_shared::auth::account::{authenticate, register};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let created = register(&pool, "alice", "Planning2024").await?;
/// let again = authenticate(&pool, "alice", "Planning2024").await?;
/// assert_eq!(again.map(|u| u.id), Some(created.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::password::{hash_password, validate_password_strength, verify_password, PasswordError};
use crate::models::user::{CreateUser, User, UserRole};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Who is signed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Why a registration was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Username must be between 3 and 50 characters")]
    InvalidUsername,

    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Username is already taken")]
    UsernameTaken,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks the username shape; returns the trimmed name.
pub fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let trimmed = username.trim();
    let length = trimmed.chars().count();

    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(ValidationError::InvalidUsername);
    }

    Ok(trimmed)
}

/// Creates an account with role `user`.
///
/// Checks run in order: username shape, password policy, then uniqueness.
///
/// # Errors
///
/// `AccountError::Validation` for every user-correctable problem, including a
/// username that loses a concurrent race for the same name.
pub async fn register(
    pool: &PgPool,
    username: &str,
    secret: &str,
) -> Result<UserIdentity, AccountError> {
    let username = validate_username(username)?;
    validate_password_strength(secret)?;

    if User::username_exists(pool, username).await? {
        debug!(username, "Registration refused: username taken");
        return Err(ValidationError::UsernameTaken.into());
    }

    let secret_hash = hash_password(secret)?;

    let user = User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            secret_hash,
            role: UserRole::User,
        },
    )
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AccountError::Validation(ValidationError::UsernameTaken),
        _ => AccountError::Database(e),
    })?;

    info!(user_id = %user.id, "User registered");

    Ok(UserIdentity::from(&user))
}

/// Verifies a username/secret pair and records the login.
///
/// Unknown users and wrong secrets both yield `Ok(None)`.
pub async fn authenticate(
    pool: &PgPool,
    username: &str,
    secret: &str,
) -> Result<Option<UserIdentity>, AccountError> {
    let Some(user) = User::find_by_username(pool, username.trim()).await? else {
        return Ok(None);
    };

    if !verify_password(secret, &user.secret_hash)? {
        debug!(user_id = %user.id, "Login refused: wrong secret");
        return Ok(None);
    }

    User::update_last_login(pool, user.id).await?;
    info!(user_id = %user.id, "User logged in");

    Ok(Some(UserIdentity::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        assert_eq!(validate_username("  alice "), Ok("alice"));
    }

    #[test]
    fn test_username_length_bounds() {
        assert_eq!(validate_username("ab"), Err(ValidationError::InvalidUsername));
        assert_eq!(validate_username("   "), Err(ValidationError::InvalidUsername));
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert_eq!(
            validate_username(&"x".repeat(51)),
            Err(ValidationError::InvalidUsername)
        );
    }

    #[test]
    fn test_validation_error_serializes_as_code() {
        assert_eq!(
            serde_json::to_string(&ValidationError::MissingUppercase).unwrap(),
            "\"missing_uppercase\""
        );
    }

    #[test]
    fn test_identity_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            secret_hash: "hash".to_string(),
            role: UserRole::Admin,
            created_at: chrono::Utc::now(),
            last_login: None,
        };
        let identity = UserIdentity::from(&user);
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.role, UserRole::Admin);
    }
}
