//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and shared read-only with every
//! request through [`crate::AppState`].

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::web::signature::{KeyError, PublicKey};

/// Caller identity prefix Discord sends in `User-Agent`.
pub const DEFAULT_USER_AGENT_PREFIX: &str = "Discord";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {source}")]
    InvalidPublicKey {
        name: &'static str,
        #[source]
        source: KeyError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Discord application public key, decoded from `DISCORD_PUBLIC_KEY`
    pub public_key: PublicKey,

    /// Required prefix of the `User-Agent` header
    pub user_agent_prefix: String,

    /// Optional replay window in seconds for `X-Signature-Timestamp`
    pub signature_max_age: Option<u64>,
}

impl Config {
    /// Configuration with defaults for everything but the key.
    pub fn new(public_key: PublicKey) -> Self {
        Config {
            port: DEFAULT_PORT,
            public_key,
            user_agent_prefix: DEFAULT_USER_AGENT_PREFIX.to_string(),
            signature_max_age: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_hex = lookup("DISCORD_PUBLIC_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_PUBLIC_KEY"))?;

        let public_key =
            PublicKey::from_hex(&key_hex).map_err(|source| ConfigError::InvalidPublicKey {
                name: "DISCORD_PUBLIC_KEY",
                source,
            })?;

        Ok(Config {
            port: parse_var(&lookup, "PORT").unwrap_or(DEFAULT_PORT),

            public_key,

            user_agent_prefix: lookup("EXPECTED_USER_AGENT_PREFIX")
                .unwrap_or_else(|| DEFAULT_USER_AGENT_PREFIX.to_string()),

            signature_max_age: parse_var(&lookup, "SIGNATURE_MAX_AGE"),
        })
    }
}

/// Parse an optional variable, warning and ignoring it if malformed.
fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(name)?;

    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}
