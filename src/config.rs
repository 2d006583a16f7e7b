use std::env;
use std::fmt;

/// Runtime configuration, read from the process environment (and `.env` via `dotenv`).
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC secret used to sign and verify session tokens.
    pub jwt_secret: String,
    /// Top-level domains accepted for signup emails. Empty means any TLD.
    pub allowed_email_tlds: Vec<String>,
    /// Whether the login cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .or_else(|| lookup("SECRET_KEY"))
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value,
            })?,
            None => 4000,
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "COOKIE_SECURE",
                value,
            })?,
            None => true,
        };

        let allowed_email_tlds = lookup("EMAIL_ALLOWED_TLDS")
            .unwrap_or_else(|| "com,net".to_string())
            .split(',')
            .map(|tld| tld.trim().trim_start_matches('.').to_lowercase())
            .filter(|tld| !tld.is_empty())
            .collect();

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            allowed_email_tlds,
            cookie_secure,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
