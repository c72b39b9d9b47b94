/// Common test utilities for API integration tests
///
/// Tests need a PostgreSQL database in `DATABASE_URL`; without one,
/// [`TestContext::new`] returns `None` and the test returns early.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use contentpulse_api::app::{build_router, AppState};
use contentpulse_api::config::{ApiConfig, Config, DatabaseConfig, GenerationConfig, SessionConfig};
use contentpulse_shared::auth::account;
use contentpulse_shared::auth::jwt::{create_token, Claims};
use contentpulse_shared::db::migrations::run_migrations;
use contentpulse_shared::generation::openai::DEFAULT_BASE_URL;
use contentpulse_shared::generation::TextGenerator;
use contentpulse_shared::models::company::Company;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_PASSWORD: &str = "Editorial9x";

pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub token: String,
    pub companies: Vec<Uuid>,
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 8,
        },
        generation: GenerationConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            suggestion_model: "gpt-4o-mini".to_string(),
            article_model: "gpt-4o".to_string(),
            timeout_seconds: 5,
        },
    }
}

impl TestContext {
    /// Connects, migrates, registers a fresh user and signs a session for it.
    pub async fn new(generator: Arc<dyn TextGenerator>) -> Option<Self> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping");
            return None;
        };

        let db = PgPool::connect(&database_url).await.expect("connect");
        run_migrations(&db).await.expect("migrations");

        let username = format!("user-{}", &Uuid::new_v4().simple().to_string()[..12]);
        let identity = account::register(&db, &username, TEST_PASSWORD)
            .await
            .expect("register test user");
        let token = create_token(&Claims::for_session(&identity), TEST_SECRET).expect("token");

        let state = AppState::new(db.clone(), test_config(&database_url), generator);

        Some(Self {
            db,
            app: build_router(state),
            token,
            companies: Vec::new(),
        })
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", self.token));

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        read_json(response).await
    }

    /// Creates a company through the API and remembers it for cleanup.
    pub async fn create_company(&mut self, name: &str) -> Uuid {
        let (status, body) = self
            .request("POST", "/v1/companies", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        self.companies.push(id);
        id
    }

    pub async fn cleanup(&self) {
        for id in &self.companies {
            Company::delete(&self.db, *id).await.unwrap();
        }
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
