/// Session tokens.
///
/// A session is an HS256-signed JWT issued at login. It names the user and is
/// valid for a fixed window (8 hours unless configured otherwise). Expiry is
/// checked with zero leeway, and an expired token is rejected exactly like a
/// missing or forged one.
///
/// # Example
///
/// ```
/// use contentpulse_shared::auth::account::UserIdentity;
/// use contentpulse_shared::auth::jwt::{create_token, validate_token, Claims};
/// use contentpulse_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = UserIdentity {
///     id: Uuid::new_v4(),
///     username: "alice".to_string(),
///     role: UserRole::User,
/// };
///
/// let token = create_token(&Claims::for_session(&identity), "a-secret-of-at-least-32-bytes!!!")?;
/// let claims = validate_token(&token, "a-secret-of-at-least-32-bytes!!!")?;
/// assert_eq!(claims.sub, identity.id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::UserIdentity;
use crate::models::user::UserRole;

/// Issuer written into and required from every token
pub const ISSUER: &str = "contentpulse";

/// Default session lifetime in hours
pub const DEFAULT_SESSION_HOURS: i64 = 8;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Session has expired")]
    Expired,

    #[error("Invalid issuer")]
    InvalidIssuer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub username: String,
    pub role: UserRole,
}

impl Claims {
    /// Claims for a session starting now with the default lifetime.
    pub fn for_session(identity: &UserIdentity) -> Self {
        Self::with_expiration(identity, Duration::hours(DEFAULT_SESSION_HOURS))
    }

    pub fn with_expiration(identity: &UserIdentity, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: identity.id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            username: identity.username.clone(),
            role: identity.role,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The identity the session was issued to.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.sub,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Signs `claims` with HS256.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, `nbf` and `exp`, then returns the claims.
///
/// # Errors
///
/// - `JwtError::Expired` once `exp` has passed
/// - `JwtError::InvalidIssuer` for tokens minted by someone else
/// - `JwtError::ValidationError` for anything else (bad signature, garbage input)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            username: "editor".to_string(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_session_lasts_eight_hours() {
        let claims = Claims::for_session(&identity());
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_round_trip_carries_identity() {
        let who = identity();
        let token = create_token(&Claims::for_session(&who), SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.identity(), who);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let claims = Claims::with_expiration(&identity(), Duration::seconds(-5));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(&Claims::for_session(&identity()), SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, "another-secret-key-that-is-long-enough"),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let mut claims = Claims::for_session(&identity());
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
