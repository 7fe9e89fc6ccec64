/// Configuration management for the knowledge listing service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Listing/index behavior
    pub index: IndexConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret used to validate bearer tokens. When unset, tokens are
    /// ignored and every request is treated as anonymous.
    pub jwt_secret: Option<String>,
    /// Whether anonymous requests may browse the index
    pub allow_anonymous: bool,
}

/// Listing/index behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Tags hidden from every listing and grouping
    pub excluded_tags: Vec<String>,
    /// Path prefixes editable through the web editor; empty disables it
    pub web_editor_prefixes: Vec<String>,
    /// Page size used when the request does not specify one
    pub default_page_size: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("KNOWLEDGE_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("KNOWLEDGE_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8084),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/knowledge".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
                run_migrations: std::env::var("DATABASE_RUN_MIGRATIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("AUTH_JWT_SECRET").ok().filter(|s| !s.is_empty()),
                allow_anonymous: std::env::var("AUTH_ALLOW_ANONYMOUS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
            },
            index: IndexConfig {
                excluded_tags: parse_list_env("EXCLUDED_TAGS"),
                web_editor_prefixes: parse_list_env("WEB_EDITOR_PREFIXES"),
                default_page_size: std::env::var("INDEX_DEFAULT_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
        })
    }
}

fn parse_list_env(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_env_parsing_skips_blanks() {
        std::env::set_var("TEST_LIST_ENV", "private, wip,,  draft ");
        assert_eq!(parse_list_env("TEST_LIST_ENV"), vec!["private", "wip", "draft"]);
        std::env::remove_var("TEST_LIST_ENV");
        assert!(parse_list_env("TEST_LIST_ENV").is_empty());
    }
}
