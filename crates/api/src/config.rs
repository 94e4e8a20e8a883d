use std::str::FromStr;

use noda_db::CALL_DEADLINE;
use sqlx::postgres::PgConnectOptions;

use crate::auth::jwt::JwtConfig;

/// Default ceiling for a whole request. Sits well above a chain of
/// [`CALL_DEADLINE`]-bounded database calls so their timeouts reach the
/// client as `DeadlineExceeded`.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default bound on reading a request body.
pub const DEFAULT_BODY_TIMEOUT_SECS: u64 = 5;

/// Configuration could not be loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} must not be blank")]
    Blank { name: &'static str },

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: `localhost`).
    pub host: String,
    /// Bind port (default: `2846`).
    pub port: u16,
    /// Whole-request ceiling in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Request body read timeout in seconds (default: `5`).
    pub body_timeout_secs: u64,
    /// PostgreSQL connection options.
    pub database: PgConnectOptions,
    /// Token signing configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default     |
    /// |------------------------|-------------|
    /// | `SERVER_HOST`          | `localhost` |
    /// | `SERVER_PORT`          | `2846`      |
    /// | `REQUEST_TIMEOUT_SECS` | `60`, must exceed the database call deadline |
    /// | `BODY_TIMEOUT_SECS`    | `5`         |
    /// | `DB_CONN_STRING`       | built from `DB_*` |
    /// | `DB_HOST`              | `localhost` |
    /// | `DB_PORT`              | `5432`      |
    /// | `DB_NAME`, `DB_USER`   | required without `DB_CONN_STRING` |
    /// | `DB_USER_PASSWORD`     | none        |
    /// | `JWT_SECRET`           | required    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "localhost".into());
        let port = parse_or("SERVER_PORT", &lookup, 2846u16)?;
        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", &lookup, DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout_secs <= CALL_DEADLINE.as_secs() {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                value: request_timeout_secs.to_string(),
                reason: format!(
                    "must exceed the {}s database call deadline",
                    CALL_DEADLINE.as_secs()
                ),
            });
        }
        let body_timeout_secs = parse_or("BODY_TIMEOUT_SECS", &lookup, DEFAULT_BODY_TIMEOUT_SECS)?;
        let database = connect_options(&lookup)?;

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::Blank { name: "JWT_SECRET" });
        }

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            body_timeout_secs,
            database,
            jwt: JwtConfig::new(secret),
        })
    }
}

fn parse_or<F, T>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// `DB_CONN_STRING` wins; otherwise the options are assembled from `DB_*`.
fn connect_options<F>(lookup: &F) -> Result<PgConnectOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DB_CONN_STRING").filter(|s| !s.trim().is_empty()) {
        return PgConnectOptions::from_str(url.trim()).map_err(|e| ConfigError::Invalid {
            name: "DB_CONN_STRING",
            value: url,
            reason: e.to_string(),
        });
    }

    let name = lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
    let user = lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port = parse_or("DB_PORT", lookup, 5432u16)?;

    let options = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .database(&name);
    Ok(match lookup("DB_USER_PASSWORD") {
        Some(password) => options.password(&password),
        None => options,
    })
}
