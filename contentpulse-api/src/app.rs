/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use contentpulse_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::from_config(pool, config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use contentpulse_shared::{
    auth::middleware::create_jwt_middleware,
    generation::{
        openai::{OpenAiConfig, OpenAiGenerator},
        scripted::ScriptedGenerator,
        GenerationError, TextGenerator,
    },
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            generator,
        }
    }

    /// Builds state with the generator the configuration asks for.
    ///
    /// Without `GENERATION_API_KEY` an empty [`ScriptedGenerator`] is used,
    /// so generation endpoints fail with an external-service error.
    pub fn from_config(db: PgPool, config: Config) -> Result<Self, GenerationError> {
        let generator: Arc<dyn TextGenerator> = match &config.generation.api_key {
            Some(key) => Arc::new(OpenAiGenerator::new(OpenAiConfig {
                api_key: key.clone(),
                base_url: config.generation.base_url.clone(),
                timeout: Duration::from_secs(config.generation.timeout_seconds),
            })?),
            None => {
                warn!("GENERATION_API_KEY not set; content generation is disabled");
                Arc::new(ScriptedGenerator::new())
            }
        };

        Ok(Self::new(db, config, generator))
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /health                                     public
/// /v1/auth/register, /v1/auth/login           public
/// /v1/auth/me                                 session
/// /v1/companies[/:company_id]                 session + membership
///     /personas, /content-types, /business-objectives
///     /build-matrix, /branding
///     /plan, /plan/suggestions, /plan/:item_id, /plan/:item_id/content
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, catalog, companies, health, plan};

    let jwt = axum::middleware::from_fn(create_jwt_middleware(state.jwt_secret().to_owned()));

    let public_auth = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let session_auth = Router::new()
        .route("/me", get(auth::me))
        .layer(jwt.clone());

    let company_routes = Router::new()
        .route("/", get(companies::list).post(companies::create))
        .route("/:company_id", get(companies::get).delete(companies::remove))
        // Catalogs
        .route("/:company_id/personas", get(catalog::list_personas).post(catalog::create_persona))
        .route("/:company_id/personas/selection", put(catalog::select_personas))
        .route(
            "/:company_id/personas/:entry_id",
            patch(catalog::update_persona).delete(catalog::delete_persona),
        )
        .route(
            "/:company_id/content-types",
            get(catalog::list_content_types).post(catalog::create_content_type),
        )
        .route("/:company_id/content-types/selection", put(catalog::select_content_types))
        .route(
            "/:company_id/content-types/:entry_id",
            patch(catalog::update_content_type).delete(catalog::delete_content_type),
        )
        .route(
            "/:company_id/business-objectives",
            get(catalog::list_objectives).post(catalog::create_objective),
        )
        .route(
            "/:company_id/business-objectives/selection",
            put(catalog::select_objectives),
        )
        .route(
            "/:company_id/business-objectives/:entry_id",
            patch(catalog::update_objective).delete(catalog::delete_objective),
        )
        .route(
            "/:company_id/build-matrix",
            get(catalog::list_matrix).put(catalog::upsert_matrix),
        )
        .route("/:company_id/build-matrix/:entry_id", delete(catalog::delete_matrix))
        .route(
            "/:company_id/branding",
            get(catalog::get_branding).put(catalog::put_branding),
        )
        // Editorial plan
        .route(
            "/:company_id/plan",
            get(plan::list)
                .post(plan::create)
                .put(plan::save)
                .delete(plan::delete_batch),
        )
        .route("/:company_id/plan/suggestions", post(plan::suggest))
        .route(
            "/:company_id/plan/:item_id",
            get(plan::get).delete(plan::delete_one),
        )
        .route(
            "/:company_id/plan/:item_id/content",
            get(plan::list_content).post(plan::generate_content),
        )
        .layer(jwt);

    let v1_routes = Router::new()
        .nest("/auth", public_auth.merge(session_auth))
        .nest("/companies", company_routes);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use axum::{body::Body, http::{Request, StatusCode}};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn state() -> AppState {
        // Lazy pool: nothing connects unless a handler touches the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/contentpulse_test")
            .unwrap();
        AppState::new(pool, test_config(), Arc::new(ScriptedGenerator::new()))
    }

    #[tokio::test]
    async fn test_company_routes_require_session() {
        let app = build_router(state());

        let response = app
            .oneshot(Request::builder().uri("/v1/companies").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_rejected() {
        let app = build_router(state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/me")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_returns_session_identity() {
        use contentpulse_shared::auth::account::UserIdentity;
        use contentpulse_shared::auth::jwt::{create_token, Claims};
        use contentpulse_shared::models::user::UserRole;

        let state = state();
        let identity = UserIdentity {
            id: uuid::Uuid::new_v4(),
            username: "editor".to_string(),
            role: UserRole::User,
        };
        let token = create_token(&Claims::for_session(&identity), state.jwt_secret()).unwrap();
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["username"], "editor");
    }

    #[tokio::test]
    async fn test_tenant_routes_reject_malformed_company_id() {
        use contentpulse_shared::auth::account::UserIdentity;
        use contentpulse_shared::auth::jwt::{create_token, Claims};
        use contentpulse_shared::models::user::UserRole;

        let state = state();
        let identity = UserIdentity {
            id: uuid::Uuid::new_v4(),
            username: "editor".to_string(),
            role: UserRole::User,
        };
        let token = create_token(&Claims::for_session(&identity), state.jwt_secret()).unwrap();
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/companies/not-a-uuid/plan")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Invalid company id");
    }
}
