/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT` or `PORT`: Port to bind to (default: 5001)
/// - `DATABASE_URL`: PostgreSQL connection string (optional, in-memory store if unset)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 characters)
/// - `JWT_TTL_HOURS`: Session token lifetime, 1 to 8760 (default: 24)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use shipsy_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use shipsy_shared::auth::service::DEFAULT_TOKEN_TTL_HOURS;
use std::env;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5001;

/// Longest accepted session token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 8760;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration, None selects the in-memory store
    pub database: Option<DatabaseSettings>,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session token lifetime in hours
    pub ttl_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    Pretty,

    /// One JSON object per line
    Json,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_host = get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = match get("API_PORT").or_else(|| get("PORT")) {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("Invalid port: {}", port))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database = match get("DATABASE_URL") {
            Some(url) => {
                let max_connections = get("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse::<u32>()?;
                Some(DatabaseSettings { url, max_connections })
            }
            None => None,
        };

        let jwt_secret = get("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let ttl_hours = match get("JWT_TTL_HOURS") {
            Some(hours) => hours.parse::<i64>()?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!("JWT_TTL_HOURS must be between 1 and {}", MAX_TOKEN_TTL_HOURS);
        }

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("Unknown LOG_FORMAT: {}", other),
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database,
            jwt: JwtConfig {
                secret: jwt_secret,
                ttl_hours,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5001");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(config.database.is_none());
        assert_eq!(config.jwt.ttl_hours, 24);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_configuration() {
        let config = load(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("PORT", "9999"),
            ("DATABASE_URL", "postgresql://localhost/shipsy"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_HOURS", "2"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgresql://localhost/shipsy");
        assert_eq!(database.max_connections, 4);
        assert_eq!(config.jwt.ttl_hours, 2);
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_port_fallback() {
        let config = load(&[("JWT_SECRET", SECRET), ("PORT", "3000")]).unwrap();
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(load(&[]).is_err());
        assert!(load(&[("JWT_SECRET", "short")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("API_PORT", "http")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_TTL_HOURS", "0")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        let config = load(&[("JWT_SECRET", SECRET), ("JWT_TTL_HOURS", "8760")]).unwrap();
        assert_eq!(config.jwt.ttl_hours, MAX_TOKEN_TTL_HOURS);

        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_TTL_HOURS", "8761")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_TTL_HOURS", "10000000000")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_TTL_HOURS", "-1")]).is_err());
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
