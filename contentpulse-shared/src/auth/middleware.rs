/// Session authentication for axum.
///
/// The middleware reads `Authorization: Bearer <token>`, validates the session
/// token, and inserts an [`AuthContext`] into the request extensions. Handlers
/// take `AuthContext` as an extractor; a request that reaches a handler
/// without one is rejected as unauthenticated.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use contentpulse_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn whoami(auth: AuthContext) -> String {
///     auth.username
/// }
///
/// let app: Router = Router::new()
///     .route("/me", get(whoami))
///     .layer(middleware::from_fn(create_jwt_middleware("a-secret-of-at-least-32-bytes!!!")));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use super::account::UserIdentity;
use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::UserRole;

/// The authenticated session attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub session_expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
            session_expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.user_id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidFormat(String),
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "Not authenticated".to_string()),
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(json!({
            "error": "unauthorized",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Validates the bearer token and attaches an [`AuthContext`].
///
/// Expired, forged and malformed tokens all produce 401.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Session expired".to_string()),
        _ => AuthError::InvalidToken("Invalid session".to_string()),
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

/// Captures the signing secret and returns a closure for `middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: UserRole::User,
        }
    }

    fn app() -> Router {
        Router::new()
            .route("/me", get(|auth: AuthContext| async move { auth.username }))
            .layer(middleware::from_fn(create_jwt_middleware(SECRET)))
    }

    fn request(auth: Option<String>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_context_from_claims() {
        let who = identity();
        let claims = Claims::for_session(&who);
        let context = AuthContext::from_claims(&claims);
        assert_eq!(context.identity(), who);
        assert_eq!(context.session_expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn test_valid_session_reaches_handler() {
        let token = create_token(&Claims::for_session(&identity()), SECRET).unwrap();
        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = app().oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthorized() {
        let claims = Claims::with_expiration(&identity(), chrono::Duration::seconds(-1));
        let token = create_token(&claims, SECRET).unwrap();
        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_bad_request() {
        let response = app()
            .oneshot(request(Some("Basic abc".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
