/// Authentication and authorization.
///
/// # Modules
///
/// - [`account`]: registration and login (`register`, `authenticate`)
/// - [`password`]: Argon2id hashing and the password policy
/// - [`jwt`]: 8-hour session tokens
/// - [`middleware`]: axum middleware attaching an `AuthContext`
/// - [`authorization`]: company membership checks producing a `TenantContext`

pub mod account;
pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
