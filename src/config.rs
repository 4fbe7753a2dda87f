//! Client configuration
//!
//! A [`ClientConfig`] is a plain value handed to the client. It can be built in
//! code, read from the environment, read from a JSON or YAML file, or loaded from
//! the default file with environment overrides on top.

use crate::error::{Result, SdkError};
use crate::logging::{self, LogLevel};
use anyhow::Context;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

pub const DEFAULT_SERVER_URL: &str = "https://api.deltastream.io/v2";

const ENV_DSN: &str = "DELTASTREAM_DSN";
const ENV_SERVER_URL: &str = "DELTASTREAM_SERVER_URL";
const ENV_TOKEN: &str = "DELTASTREAM_TOKEN";
const ENV_ORGANIZATION_ID: &str = "DELTASTREAM_ORGANIZATION_ID";
const ENV_ORG_ID: &str = "DELTASTREAM_ORG_ID";
const ENV_DATABASE_NAME: &str = "DELTASTREAM_DATABASE_NAME";
const ENV_SCHEMA_NAME: &str = "DELTASTREAM_SCHEMA_NAME";
const ENV_STORE_NAME: &str = "DELTASTREAM_STORE_NAME";
const ENV_LOG_LEVEL: &str = "DELTASTREAM_LOG_LEVEL";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Connection and session settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Full connection string; takes precedence over token and organization
    #[serde(default)]
    pub dsn: Option<String>,
    /// API token. Never written back to disk.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Database to switch to on [`initialize`](crate::DeltaStreamClient::initialize)
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            dsn: None,
            token: None,
            organization_id: None,
            database_name: None,
            schema_name: None,
            store_name: None,
            log_level: LogLevel::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("dsn", &self.dsn.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("organization_id", &self.organization_id)
            .field("database_name", &self.database_name)
            .field("schema_name", &self.schema_name)
            .field("store_name", &self.store_name)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ClientConfig {
    /// Settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from any key lookup, using the same variable names as [`from_env`](Self::from_env)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup);
        config
    }

    /// Replace fields with every variable `lookup` knows about
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(dsn) = get(ENV_DSN) {
            self.dsn = Some(dsn);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(org) = get(ENV_ORGANIZATION_ID).or_else(|| get(ENV_ORG_ID)) {
            self.organization_id = Some(org);
        }
        if let Some(db) = get(ENV_DATABASE_NAME) {
            self.database_name = Some(db);
        }
        if let Some(schema) = get(ENV_SCHEMA_NAME) {
            self.schema_name = Some(schema);
        }
        if let Some(store) = get(ENV_STORE_NAME) {
            self.store_name = Some(store);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            match level.parse() {
                Ok(level) => self.log_level = level,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
            }
        }
    }

    /// Start file logging at the configured level
    ///
    /// See [`logging::init`]; `None` when the level is off or a subscriber is
    /// already installed.
    pub fn init_logging(&self, path: Option<&Path>) -> Option<WorkerGuard> {
        logging::init(self.log_level, path)
    }

    /// Read a JSON or YAML file, chosen by extension (`.json`, `.yaml`, `.yml`)
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::read_file(path).map_err(|e| SdkError::invalid(format!("{:#}", e)))
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };
        Ok(config)
    }

    /// `<config dir>/deltastream/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("deltastream").join("config.yaml"))
    }

    /// Default file if present, with the environment on top
    ///
    /// A missing file is not an error; an unreadable one is.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(&|key: &str| std::env::var(key).ok());
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories. The token is not written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.write_file(path)
            .map_err(|e| SdkError::invalid(format!("{:#}", e)))
    }

    fn write_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Check that the settings can authenticate
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(SdkError::invalid("server_url must not be empty"));
        }
        if self.dsn.is_some() {
            return Ok(());
        }

        let Some(token) = self.token.as_deref() else {
            return Err(SdkError::invalid(
                "either a DSN or a token with an organization id is required",
            ));
        };
        if self.organization_id.is_none() {
            return Err(SdkError::invalid("organization_id is required when using a token"));
        }

        if let Some(expiry) = token_expiry(token) {
            if expiry <= Utc::now() {
                return Err(SdkError::invalid(format!(
                    "token expired at {}",
                    expiry.to_rfc3339()
                )));
            }
        }

        Ok(())
    }
}

/// `exp` claim of a JWT, if the token is one
///
/// The signature is not checked; this only catches tokens that are certainly stale.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}
