/// Configuration management for the API server
///
/// Configuration is read from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST` / `API_PORT`: bind address (default: 0.0.0.0:8080)
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: `*`)
/// - `JWT_SECRET`: session signing secret, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: session lifetime (default: 8)
/// - `GENERATION_API_KEY`: text-generation provider key (optional)
/// - `GENERATION_BASE_URL`: provider base URL (default: OpenAI)
/// - `SUGGESTION_MODEL` / `ARTICLE_MODEL`: model names
/// - `GENERATION_TIMEOUT_SECONDS`: provider request timeout (default: 120)
///
/// # Example
///
/// ```no_run
/// use contentpulse_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use contentpulse_shared::generation::{openai::DEFAULT_BASE_URL, ModelSettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for session token signing
    ///
    /// Must be kept secret and be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,

    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// `None` disables the provider; generation requests then fail cleanly
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub suggestion_model: String,
    pub article_model: String,
    pub timeout_seconds: u64,
}

impl GenerationConfig {
    pub fn suggestion_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.suggestion_model.clone(),
            ..ModelSettings::suggestions()
        }
    }

    pub fn article_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.article_model.clone(),
            ..ModelSettings::article()
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `JWT_SECRET` is shorter than 32 characters.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let cors_origins = parse_origins(&var_or("CORS_ORIGINS", "*"));

        Ok(Self {
            api: ApiConfig {
                host: var_or("API_HOST", "0.0.0.0"),
                port: parse_var("API_PORT", 8080)?,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            session: SessionConfig {
                secret: jwt_secret,
                ttl_hours: parse_var("SESSION_TTL_HOURS", 8)?,
            },
            generation: GenerationConfig {
                api_key: env::var("GENERATION_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                base_url: var_or("GENERATION_BASE_URL", DEFAULT_BASE_URL),
                suggestion_model: var_or("SUGGESTION_MODEL", &ModelSettings::suggestions().model),
                article_model: var_or("ARTICLE_MODEL", &ModelSettings::article().model),
                timeout_seconds: parse_var("GENERATION_TIMEOUT_SECONDS", 120)?,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            max_connections: 10,
        },
        session: SessionConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            ttl_hours: 8,
        },
        generation: GenerationConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            suggestion_model: "gpt-4o-mini".to_string(),
            article_model: "gpt-4o".to_string(),
            timeout_seconds: 120,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn test_model_settings_follow_config() {
        let mut config = test_config();
        config.generation.suggestion_model = "small-model".to_string();

        let settings = config.generation.suggestion_settings();
        assert_eq!(settings.model, "small-model");
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 10_000);

        assert_eq!(config.generation.article_settings().temperature, 0.7);
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let json = serde_json::to_string(&test_config()).unwrap();
        assert!(!json.contains("test-secret-key"));
    }
}
