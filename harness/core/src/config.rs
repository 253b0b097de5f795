//! Configuration
//!
//! Startup configuration for the harness. Values come from an optional TOML
//! file, then environment variables, then explicit overrides (CLI flags),
//! later sources winning. Required values are checked once everything is
//! merged, and loading fails fast naming the first missing one.
//!
//! # Environment Variables
//!
//! - `BODHI_APP_CLIENT_ID` (required): client identifier
//! - `BODHI_AUTH_SERVER_URL` (required): auth server URL
//! - `BODHI_APP_URL` (required): application origin URL
//! - `BODHI_BASE_PATH`: base path for routed deployment (default `/`)
//! - `BODHI_SERVER_URL`: API server (default `http://localhost:1135`)
//! - `BODHI_ACCESS_TOKEN`: pre-provisioned bearer token
//! - `BODHI_LOG_LEVEL`: client log verbosity (default `debug`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default API server
pub const DEFAULT_SERVER_URL: &str = "http://localhost:1135";

/// Default base path
pub const DEFAULT_BASE_PATH: &str = "/";

/// Default log verbosity
pub const DEFAULT_LOG_LEVEL: &str = "debug";

const ENV_CLIENT_ID: &str = "BODHI_APP_CLIENT_ID";
const ENV_AUTH_SERVER_URL: &str = "BODHI_AUTH_SERVER_URL";
const ENV_APP_URL: &str = "BODHI_APP_URL";
const ENV_BASE_PATH: &str = "BODHI_BASE_PATH";
const ENV_SERVER_URL: &str = "BODHI_SERVER_URL";
const ENV_ACCESS_TOKEN: &str = "BODHI_ACCESS_TOKEN";
const ENV_LOG_LEVEL: &str = "BODHI_LOG_LEVEL";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is absent from every source
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),

    /// A value is present but unusable
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Raw, partially-filled configuration (file contents or overrides)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Client identifier
    pub client_id: Option<String>,
    /// Auth server URL
    pub auth_server_url: Option<String>,
    /// Application origin URL
    pub app_url: Option<String>,
    /// Base path for routed deployment
    pub base_path: Option<String>,
    /// API server URL
    pub server_url: Option<String>,
    /// Pre-provisioned bearer token
    pub access_token: Option<String>,
    /// Client log verbosity
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup (tests use a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            client_id: get(ENV_CLIENT_ID),
            auth_server_url: get(ENV_AUTH_SERVER_URL),
            app_url: get(ENV_APP_URL),
            base_path: get(ENV_BASE_PATH),
            server_url: get(ENV_SERVER_URL),
            access_token: get(ENV_ACCESS_TOKEN),
            log_level: get(ENV_LOG_LEVEL),
        }
    }

    /// Parse overrides from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Layer `other` on top of `self`; values present in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            client_id: other.client_id.or(self.client_id),
            auth_server_url: other.auth_server_url.or(self.auth_server_url),
            app_url: other.app_url.or(self.app_url),
            base_path: other.base_path.or(self.base_path),
            server_url: other.server_url.or(self.server_url),
            access_token: other.access_token.or(self.access_token),
            log_level: other.log_level.or(self.log_level),
        }
    }
}

/// Resolved harness configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Client identifier
    pub client_id: String,
    /// Auth server URL
    pub auth_server_url: String,
    /// Application origin URL, no trailing slash
    pub app_url: String,
    /// Base path, always starting and ending with `/`
    pub base_path: String,
    /// API server URL, no trailing slash
    pub server_url: String,
    /// Pre-provisioned bearer token
    pub access_token: Option<String>,
    /// Client log verbosity
    pub log_level: String,
}

impl AppConfig {
    /// Resolve from the process environment alone
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(ConfigOverrides::from_env())
    }

    /// Resolve a merged set of values, checking required keys
    pub fn resolve(values: ConfigOverrides) -> Result<Self, ConfigError> {
        let client_id = values.client_id.ok_or(ConfigError::Missing(ENV_CLIENT_ID))?;
        let auth_server_url = values
            .auth_server_url
            .ok_or(ConfigError::Missing(ENV_AUTH_SERVER_URL))?;
        let app_url = values.app_url.ok_or(ConfigError::Missing(ENV_APP_URL))?;
        let server_url = values
            .server_url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Ok(Self {
            client_id: client_id.trim().to_string(),
            auth_server_url: validate_url(ENV_AUTH_SERVER_URL, &auth_server_url)?,
            app_url: validate_url(ENV_APP_URL, &app_url)?,
            base_path: normalize_base_path(values.base_path.as_deref()),
            server_url: validate_url(ENV_SERVER_URL, &server_url)?,
            access_token: values.access_token,
            log_level: values
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Path the auth server redirects back to, relative to the app origin
    #[must_use]
    pub fn callback_path(&self) -> String {
        format!("{}callback", self.base_path)
    }

    /// Absolute redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.app_url, self.callback_path())
    }
}

/// Default config file location (`$XDG_CONFIG_HOME/bodhi-sample/config.toml`)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bodhi-sample").join("config.toml"))
}

/// Read a config file into overrides
pub fn load_config_from_path(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigOverrides::from_toml_str(&text)
}

/// Load configuration: file (if any), then environment, then `overrides`
///
/// An explicit `path` must exist. The default path is only read when it
/// exists.
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => load_config_from_path(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading default config file");
                load_config_from_path(&path)?
            }
            None => ConfigOverrides::default(),
        },
    };

    AppConfig::resolve(file.merge(ConfigOverrides::from_env()).merge(overrides))
}

fn validate_url(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("expected an http(s) URL, got {value:?}"),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn normalize_base_path(value: Option<&str>) -> String {
    let trimmed = value.map(str::trim).unwrap_or(DEFAULT_BASE_PATH);
    let inner = trimmed.trim_matches('/');
    if inner.is_empty() {
        DEFAULT_BASE_PATH.to_string()
    } else {
        format!("/{inner}/")
    }
}
