//! Application settings and configuration structures.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// Rate limiting configuration
    pub rate_limit: RateLimitSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// LLM provider used for medication note analysis
    pub ai: AiSettings,

    /// Blog image uploads
    pub uploads: UploadSettings,

    /// Startup seeding
    pub seed: SeedSettings,

    /// Response security headers
    pub security: SecuritySettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per window on `/api/auth`
    pub auth_requests_per_window: u32,

    /// Requests allowed per window on the rest of `/api`
    pub api_requests_per_window: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// OpenAI-compatible chat completion provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    /// API key; note analysis is disabled when absent
    pub api_key: Option<String>,

    /// Base URL of the chat completions API
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Blog image upload storage.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Directory uploaded files are written to
    pub directory: PathBuf,

    /// URL prefix the directory is served under
    pub public_path: String,

    /// Maximum accepted file size in bytes
    pub max_bytes: usize,
}

/// Seed data configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    /// Insert the default admin, categories, tags and sample posts
    pub enabled: bool,

    /// Email of the seeded admin account
    pub admin_email: String,

    /// Password of the seeded admin account
    pub admin_password: String,
}

/// Security header configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// Send Strict-Transport-Security (only behind HTTPS)
    pub enable_hsts: bool,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::base_builder(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("ai.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option(
                "cors.allowed_origins",
                std::env::var("FRONTEND_URL").ok().map(|url| vec![url]),
            )?
            .build()?
            .try_deserialize()
            .and_then(Self::validated)
    }

    /// Defaults shared by [`Settings::load`] and test fixtures.
    fn base_builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.access_token_expiry_minutes", 60)?
            .set_default("jwt.refresh_token_expiry_days", 7)?
            .set_default("rate_limit.auth_requests_per_window", 10)?
            .set_default("rate_limit.api_requests_per_window", 120)?
            .set_default("rate_limit.window_seconds", 60)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("ai.base_url", "https://api.openai.com/v1")?
            .set_default("ai.model", "gpt-4o-mini")?
            .set_default("ai.timeout_secs", 30)?
            .set_default("uploads.directory", "uploads")?
            .set_default("uploads.public_path", "/uploads")?
            .set_default("uploads.max_bytes", 5 * 1024 * 1024_i64)?
            .set_default("seed.enabled", false)?
            .set_default("seed.admin_email", "admin@healthblog.com")?
            .set_default("seed.admin_password", "admin123")?
            .set_default("security.enable_hsts", false)
    }

    fn validated(settings: Self) -> Result<Self, ConfigError> {
        if settings.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                settings.jwt.secret.len()
            )));
        }
        let public_path = settings.uploads.public_path.trim_end_matches('/');
        if !public_path.starts_with('/') || public_path.len() < 2 {
            return Err(ConfigError::Message(format!(
                "uploads.public_path must be an absolute sub-path such as /uploads, got {:?}",
                settings.uploads.public_path
            )));
        }
        if settings.uploads.max_bytes == 0 {
            return Err(ConfigError::Message(
                "uploads.max_bytes must be greater than zero".into(),
            ));
        }
        Ok(settings)
    }

    /// Settings for tests and local tooling: defaults plus the given
    /// database URL and JWT secret, no files or environment involved.
    pub fn for_testing(database_url: &str, jwt_secret: &str) -> Result<Self, ConfigError> {
        Self::base_builder("test")?
            .set_override("database.url", database_url)?
            .set_override("jwt.secret", jwt_secret)?
            .set_override("database.run_migrations", false)?
            .build()?
            .try_deserialize()
            .and_then(Self::validated)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the service is running in production.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
