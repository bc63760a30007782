use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

const REDACTED: &str = "<redacted>";

/// Where the Postgres connection comes from
#[derive(Clone, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
        sslmode: String,
    },
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match self {
            DatabaseConfig::Url(url) => {
                PgConnectOptions::from_str(url).map_err(|_| ConfigError::Invalid {
                    name: "DATABASE_URL",
                    value: REDACTED.to_string(),
                })
            }
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                dbname,
                sslmode,
            } => {
                let ssl_mode =
                    PgSslMode::from_str(sslmode).map_err(|_| ConfigError::Invalid {
                        name: "DB_SSLMODE",
                        value: sslmode.clone(),
                    })?;

                Ok(PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(dbname)
                    .ssl_mode(ssl_mode))
            }
        }
    }
}

// Both configs carry credentials, so Debug is written by hand.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // A URL may embed the password
            DatabaseConfig::Url(_) => f.debug_tuple("Url").field(&REDACTED).finish(),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                dbname,
                sslmode,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &REDACTED)
                .field("dbname", dbname)
                .field("sslmode", sslmode)
                .finish(),
        }
    }
}

/// Process configuration, read once at startup
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// `None` runs on the in-memory store
    pub database: Option<DatabaseConfig>,
    pub max_connections: u32,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded environment file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig::Url(url)),
            None => match get("DB_HOST") {
                Some(host) => Some(DatabaseConfig::Parts {
                    host,
                    port: parse_or(get("DB_PORT"), "DB_PORT", 5432)?,
                    user: get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                    password: get("DB_PASSWORD").unwrap_or_default(),
                    dbname: get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
                    sslmode: get("DB_SSLMODE").unwrap_or_else(|| "disable".to_string()),
                }),
                None => None,
            },
        };

        Ok(Self {
            host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080)?,
            jwt_secret,
            database,
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
        })
    }

    /// Host and port for the listener; host names such as `localhost` are resolved on bind
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &REDACTED)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
