//! Process configuration read from the environment (optionally seeded from `.env`).

use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sideboarddb";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub body_limit: usize,
    pub auth: AuthConfig,
}

/// Key material used to verify bearer tokens.
#[derive(Clone)]
pub enum AuthKey {
    /// HS256 shared secret.
    Secret(String),
    /// RS256 public key, PEM text.
    RsaPem(String),
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKey::Secret(_) => f.write_str("Secret(..)"),
            AuthKey::RsaPem(_) => f.write_str("RsaPem(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub key: AuthKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let max_connections = parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let ip: IpAddr = parse_or(get("BIND_ADDR"), "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?;
        let body_limit = parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", crate::DEFAULT_BODY_LIMIT)?;

        let key = match (get("AUTH_SECRET"), get("AUTH_PUBLIC_KEY_PEM")) {
            (Some(secret), None) => AuthKey::Secret(secret),
            (None, Some(pem)) => AuthKey::RsaPem(pem),
            (Some(_), Some(_)) => {
                return Err(ConfigError::Ambiguous(
                    "set only one of AUTH_SECRET and AUTH_PUBLIC_KEY_PEM".into(),
                ))
            }
            (None, None) => return Err(ConfigError::Missing("AUTH_SECRET or AUTH_PUBLIC_KEY_PEM")),
        };

        Ok(AppConfig {
            database_url,
            max_connections,
            bind_addr: SocketAddr::new(ip, port),
            body_limit,
            auth: AuthConfig {
                key,
                issuer: get("AUTH_ISSUER"),
                audience: get("AUTH_AUDIENCE"),
            },
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
