/// Authentication endpoints
///
/// - `POST /v1/auth/register` - create an account
/// - `POST /v1/auth/login` - exchange credentials for a session token
/// - `GET /v1/auth/me` - the identity behind the current session
///
/// Sessions last `SESSION_TTL_HOURS` (8 by default). An expired session is
/// treated exactly like a missing one.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use contentpulse_shared::auth::{
    account::{self, UserIdentity},
    jwt::{self, Claims},
    middleware::AuthContext,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,

    /// Checked against the password policy by the account service
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserIdentity,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Register a new user
///
/// ```text
/// POST /v1/auth/register
/// { "username": "marie", "password": "Editorial9" }
/// ```
///
/// # Errors
///
/// - `422`: username length or password policy (too short, missing
///   uppercase, lowercase or digit)
/// - `409`: username already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserIdentity>)> {
    req.validate()?;

    let identity = account::register(&state.db, &req.username, &req.password).await?;

    Ok((StatusCode::CREATED, Json(identity)))
}

/// Log in and receive a session token
///
/// Unknown usernames and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate()?;

    let identity = account::authenticate(&state.db, &req.username, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let claims = Claims::with_expiration(
        &identity,
        Duration::hours(state.config.session.ttl_hours),
    );
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;
    let expires_at = AuthContext::from_claims(&claims).session_expires_at;

    Ok(Json(SessionResponse {
        user: identity,
        access_token,
        expires_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub role: contentpulse_shared::models::user::UserRole,
    pub session_expires_at: DateTime<Utc>,
}

pub async fn me(auth: AuthContext) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user_id,
        username: auth.username,
        role: auth.role,
        session_expires_at: auth.session_expires_at,
    })
}
