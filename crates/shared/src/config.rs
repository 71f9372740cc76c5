//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::jwt::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token validation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

impl JwtSettings {
    /// Converts the settings into the token service configuration.
    ///
    /// The expiry is truncated to whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the expiry is shorter than a minute.
    pub fn jwt_config(&self) -> AppResult<JwtConfig> {
        let minutes = i64::try_from(self.access_token_expiry_secs / 60)
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "jwt.access_token_expiry_secs out of range: {}",
                    self.access_token_expiry_secs
                ))
            })?;
        Ok(JwtConfig {
            secret: self.secret.clone(),
            access_token_expires_minutes: minutes,
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `CLEARANCE__*` variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CLEARANCE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                (
                    "CLEARANCE__DATABASE__URL",
                    Some("postgres://localhost/clearance_test"),
                ),
                ("CLEARANCE__JWT__SECRET", Some("env-secret")),
                ("CLEARANCE__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/clearance_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.server.port, 9090);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("CLEARANCE__DATABASE__URL", None::<&str>),
                ("CLEARANCE__JWT__SECRET", Some("env-secret")),
            ],
            || {
                let err = AppConfig::load().unwrap_err();
                assert!(matches!(err, AppError::Configuration(ref msg) if msg.contains("url")));
            },
        );
    }

    #[test]
    fn test_jwt_config_truncates_to_minutes() {
        let settings = JwtSettings {
            secret: "s".to_string(),
            access_token_expiry_secs: 959,
        };
        let jwt = settings.jwt_config().unwrap();
        assert_eq!(jwt.secret, "s");
        assert_eq!(jwt.access_token_expires_minutes, 15);
    }

    #[test]
    fn test_jwt_config_rejects_sub_minute_expiry() {
        let settings = JwtSettings {
            secret: "s".to_string(),
            access_token_expiry_secs: 59,
        };
        assert!(matches!(
            settings.jwt_config(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_server_config_default() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }
}
