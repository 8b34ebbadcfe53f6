//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_BIND_ADDR` - listen address (default: `0.0.0.0:8080`)
//! - `MARKETPLACE_API_VENDOR` - vendor segment of the `Accept` media type
//!   (default: `marketplace`)
//! - `MARKETPLACE_DEFAULT_API_VERSION` - version used when the `Accept`
//!   header names none (default: `1`)
//! - `MARKETPLACE_BCRYPT_COST` - bcrypt work factor, 4..=31 (default: bcrypt's)
//! - `USE_PERSISTENT_STORES` - `true` to use PostgreSQL (default: `false`)
//! - `DATABASE_URL` - required when `USE_PERSISTENT_STORES` is `true`

use std::net::SocketAddr;

use thiserror::Error;

use marketplace_auth::PasswordHasher;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_VENDOR: &str = "marketplace";
const DEFAULT_API_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub api_vendor: String,
    pub default_api_version: u32,
    pub bcrypt_cost: u32,
    /// Set only when persistent stores are enabled.
    pub database_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_vendor: DEFAULT_VENDOR.to_string(),
            default_api_version: DEFAULT_API_VERSION,
            bcrypt_cost: bcrypt_default_cost(),
            database_url: None,
        }
    }
}

impl ApiConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = parse_var("MARKETPLACE_BIND_ADDR", &get_or("MARKETPLACE_BIND_ADDR", DEFAULT_BIND_ADDR))?;

        let api_vendor = get_or("MARKETPLACE_API_VENDOR", DEFAULT_VENDOR).trim().to_lowercase();
        if api_vendor.is_empty() || api_vendor.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETPLACE_API_VENDOR".to_string(),
                "must be a single non-empty token".to_string(),
            ));
        }

        let default_api_version: u32 = match lookup("MARKETPLACE_DEFAULT_API_VERSION") {
            Some(raw) => parse_var("MARKETPLACE_DEFAULT_API_VERSION", &raw)?,
            None => DEFAULT_API_VERSION,
        };
        if default_api_version == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETPLACE_DEFAULT_API_VERSION".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let bcrypt_cost: u32 = match lookup("MARKETPLACE_BCRYPT_COST") {
            Some(raw) => parse_var("MARKETPLACE_BCRYPT_COST", &raw)?,
            None => bcrypt_default_cost(),
        };
        PasswordHasher::new(bcrypt_cost).map_err(|e| {
            ConfigError::InvalidEnvVar("MARKETPLACE_BCRYPT_COST".to_string(), e.to_string())
        })?;

        let persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => parse_flag("USE_PERSISTENT_STORES", &raw)?,
            None => false,
        };
        let database_url = if persistent {
            Some(lookup("DATABASE_URL").ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?)
        } else {
            None
        };

        Ok(Self {
            bind_addr,
            api_vendor,
            default_api_version,
            bcrypt_cost,
            database_url,
        })
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost).unwrap_or_default()
    }
}

fn bcrypt_default_cost() -> u32 {
    PasswordHasher::default().cost()
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}
