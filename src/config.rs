use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::{fmt, path::Path, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Optional env file read at startup. Real environment variables win.
pub const ENV_FILE: &str = "resources/app.env";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "uniswap";
const DEFAULT_DB_SSLMODE: &str = "disable";

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 60);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

/// Database connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode)
    }

    /// Opens the connection pool and checks it with a first connection
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        info!(host = %self.host, port = self.port, database = %self.name, "Connecting to database");

        PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .max_lifetime(CONNECTION_LIFETIME)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(self.connect_options())
            .await
    }
}

/// Process configuration
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database", &self.database)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Loads `resources/app.env` when present, then reads the environment
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::from_path(Path::new(ENV_FILE)) {
            Ok(()) => debug!(path = ENV_FILE, "Loaded env file"),
            Err(e) if e.not_found() => {
                warn!(path = ENV_FILE, "Env file not found, using environment only")
            }
            Err(source) => {
                return Err(ConfigError::File {
                    path: ENV_FILE.to_string(),
                    source,
                })
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let ssl_mode = get("DB_SSLMODE").unwrap_or_else(|| DEFAULT_DB_SSLMODE.to_string());
        let ssl_mode = PgSslMode::from_str(&ssl_mode).map_err(|_| ConfigError::Invalid {
            key: "DB_SSLMODE",
            value: ssl_mode.clone(),
        })?;

        let database = DatabaseConfig {
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: parse_or(get("DB_PORT"), "DB_PORT", DEFAULT_DB_PORT)?,
            user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            password: get("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?,
            name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            ssl_mode,
        };

        let jwt_secret = get("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            port,
            database,
            jwt_secret,
        })
    }

    /// Address the HTTP server binds to
    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or(value: Option<String>, key: &'static str, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [("DB_PASSWORD", "pw"), ("JWT_SECRET", "s3cret")];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.name, "uniswap");
        assert!(matches!(config.database.ssl_mode, PgSslMode::Disable));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DB_PASSWORD", "pw"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "market"),
            ("DB_SSLMODE", "require"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.name, "market");
        assert!(matches!(config.database.ssl_mode, PgSslMode::Require));
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[
            ("DB_PASSWORD", "pw"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", ""),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
    }

    #[rstest]
    #[case::no_password(&[("JWT_SECRET", "s3cret")], "DB_PASSWORD")]
    #[case::no_secret(&[("DB_PASSWORD", "pw")], "JWT_SECRET")]
    #[case::blank_secret(&[("DB_PASSWORD", "pw"), ("JWT_SECRET", "   ")], "JWT_SECRET")]
    fn test_missing_required(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        let err = Config::from_lookup(lookup(pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == expected));
    }

    #[rstest]
    #[case::port("PORT", "eighty")]
    #[case::port_overflow("PORT", "70000")]
    #[case::db_port("DB_PORT", "-1")]
    #[case::ssl_mode("DB_SSLMODE", "sometimes")]
    fn test_invalid_values(#[case] key: &str, #[case] value: &str) {
        let mut pairs: Vec<(&str, &str)> = REQUIRED.to_vec();
        pairs.push((key, value));

        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: k, .. } if k == key));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("\"pw\""));
        assert!(rendered.contains("<redacted>"));
    }
}
