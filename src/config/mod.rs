//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `VISAGE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::constants::DEFAULT_AVATAR_TIMEOUT_SECS;
use crate::store::{DEFAULT_COLLECTION_NAME, DEFAULT_STORE_URL};
use crate::sync::DEFAULT_SYNC_CONCURRENCY;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VISAGE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5001`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Firestore REST base URL. Default: `https://firestore.googleapis.com`.
    pub store_url: String,

    /// Firestore project id. Required.
    pub store_project: Option<String>,

    /// Collection holding user documents. Default: `users`.
    pub store_collection: String,

    /// Bearer token sent to the store, if any.
    pub store_token: Option<String>,

    /// Face extractor sidecar URL. Default: `http://127.0.0.1:5002`.
    pub extractor_url: String,

    /// Per-avatar download timeout. Default: 10s.
    pub avatar_timeout: Duration,

    /// Candidates processed concurrently during a sync. Default: `8`.
    pub sync_concurrency: usize,

    /// Skip TLS certificate verification on avatar downloads. Default: `false`.
    pub insecure_avatar_tls: bool,

    /// Largest accepted `/detect` body. Default: 16 MiB.
    pub max_upload_bytes: usize,
}

/// Default extractor URL used when `VISAGE_EXTRACTOR_URL` is not set.
pub const DEFAULT_EXTRACTOR_URL: &str = "http://127.0.0.1:5002";

/// Default `/detect` body limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5001,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            store_url: DEFAULT_STORE_URL.to_string(),
            store_project: None,
            store_collection: DEFAULT_COLLECTION_NAME.to_string(),
            store_token: None,
            extractor_url: DEFAULT_EXTRACTOR_URL.to_string(),
            avatar_timeout: Duration::from_secs(DEFAULT_AVATAR_TIMEOUT_SECS),
            sync_concurrency: DEFAULT_SYNC_CONCURRENCY,
            insecure_avatar_tls: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VISAGE_PORT";
    const ENV_BIND_ADDR: &'static str = "VISAGE_BIND_ADDR";
    const ENV_STORE_URL: &'static str = "VISAGE_STORE_URL";
    const ENV_STORE_PROJECT: &'static str = "VISAGE_STORE_PROJECT";
    const ENV_STORE_COLLECTION: &'static str = "VISAGE_STORE_COLLECTION";
    const ENV_STORE_TOKEN: &'static str = "VISAGE_STORE_TOKEN";
    const ENV_EXTRACTOR_URL: &'static str = "VISAGE_EXTRACTOR_URL";
    const ENV_AVATAR_TIMEOUT_SECS: &'static str = "VISAGE_AVATAR_TIMEOUT_SECS";
    const ENV_SYNC_CONCURRENCY: &'static str = "VISAGE_SYNC_CONCURRENCY";
    const ENV_INSECURE_AVATAR_TLS: &'static str = "VISAGE_INSECURE_AVATAR_TLS";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "VISAGE_MAX_UPLOAD_BYTES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let store_url = Self::parse_string_from_env(Self::ENV_STORE_URL, defaults.store_url);
        let store_project = Self::parse_optional_string_from_env(Self::ENV_STORE_PROJECT);
        let store_collection =
            Self::parse_string_from_env(Self::ENV_STORE_COLLECTION, defaults.store_collection);
        let store_token = Self::parse_optional_string_from_env(Self::ENV_STORE_TOKEN);
        let extractor_url =
            Self::parse_string_from_env(Self::ENV_EXTRACTOR_URL, defaults.extractor_url);
        let avatar_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_AVATAR_TIMEOUT_SECS,
            defaults.avatar_timeout.as_secs(),
        )?);
        let sync_concurrency = Self::parse_u64_from_env(
            Self::ENV_SYNC_CONCURRENCY,
            defaults.sync_concurrency as u64,
        )? as usize;
        let insecure_avatar_tls =
            Self::parse_bool_from_env(Self::ENV_INSECURE_AVATAR_TLS, defaults.insecure_avatar_tls)?;
        let max_upload_bytes = Self::parse_u64_from_env(
            Self::ENV_MAX_UPLOAD_BYTES,
            defaults.max_upload_bytes as u64,
        )? as usize;

        Ok(Self {
            port,
            bind_addr,
            store_url,
            store_project,
            store_collection,
            store_token,
            extractor_url,
            avatar_timeout,
            sync_concurrency,
            insecure_avatar_tls,
            max_upload_bytes,
        })
    }

    /// Validates required settings and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_project.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_STORE_PROJECT,
            });
        }

        if self.sync_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SYNC_CONCURRENCY,
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.avatar_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_AVATAR_TIMEOUT_SECS,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_UPLOAD_BYTES,
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected true or false".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
