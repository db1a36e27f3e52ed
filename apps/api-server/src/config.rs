//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use mindstream_infra::{JwtConfig, RateLimitConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// Cross-origin policy for browser clients.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins. Empty reflects any requesting origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Reads `CORS_ORIGIN`, a comma-separated origin list. Unset or `*`
    /// means any origin.
    pub fn from_env() -> Self {
        let allowed_origins = env::var("CORS_ORIGIN")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(String::from)
            .collect();

        Self { allowed_origins }
    }
}

/// Locations of the two JSON collections.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub posts_file: PathBuf,
    pub visitors_file: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            posts_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "./data/posts.json".to_string())
                .into(),
            visitors_file: env::var("VISITORS_FILE")
                .unwrap_or_else(|_| "./data/visitors.json".to_string())
                .into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            storage: StorageConfig::from_env(),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            cors: CorsConfig::from_env(),
        }
    }
}
