//! Configuration system (layered: explicit > env > credential file).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, ClientError, ErrorCode, Result, StructuredError};

pub const DEFAULT_BASE_URL: &str = "https://app.chatwoot.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "SUPPORTDESK_BASE_URL";
pub const ENV_API_TOKEN: &str = "SUPPORTDESK_API_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "SUPPORTDESK_ACCOUNT_ID";
pub const ENV_TIMEOUT_SECS: &str = "SUPPORTDESK_TIMEOUT_SECS";

/// On-disk layout of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

/// Resolved client configuration.
///
/// Resolution order, later wins:
/// 1. `config.toml` (see [`Config::default_path`])
/// 2. Environment variables (`.env` is loaded first)
/// 3. Explicit `with_*` calls, e.g. from CLI flags
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    api_token: Option<String>,
    account_id: Option<u64>,
    timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| ".."))
            .field("account_id", &self.account_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            account_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `~/.supportdesk/config.toml`, or a relative `.supportdesk/` when no home exists.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".supportdesk"))
            .unwrap_or_else(|| PathBuf::from(".supportdesk"))
            .join("config.toml")
    }

    /// Load every layer: the file at `path` (or the default path, if it
    /// exists), then `.env` and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::new()
                }
            }
        };
        base.apply_env()
    }

    /// Read a TOML config file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            ClientError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })?;

        let mut config = Self::new();
        if let Some(url) = file.base_url {
            config = config.with_base_url(url);
        }
        config.api_token = file.api_token.filter(|t| !t.is_empty());
        config.account_id = file.account_id;
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Write the persistable fields to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = ConfigFile {
            base_url: Some(self.base_url.clone()),
            api_token: self.api_token.clone(),
            account_id: self.account_id,
            timeout_secs: Some(self.timeout.as_secs()),
        };
        let serialized = toml::to_string(&file)
            .map_err(|e| ClientError::Configuration(format!("cannot serialize config: {e}")))?;
        fs::write(path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Overlay process environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup (the environment in production).
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self = self.with_base_url(url);
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(raw) = get(ENV_ACCOUNT_ID) {
            self.account_id = Some(parse_positive(ENV_ACCOUNT_ID, &raw)?);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.timeout = Duration::from_secs(parse_positive(ENV_TIMEOUT_SECS, &raw)?);
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drop the stored token (used by `auth logout`).
    pub fn without_api_token(mut self) -> Self {
        self.api_token = None;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn account_id(&self) -> Option<u64> {
        self.account_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn require_token(&self) -> Result<&str> {
        self.api_token().ok_or_else(|| {
            AuthError::new(format!(
                "no API access token configured; set {ENV_API_TOKEN} or run `supportdesk auth login`"
            ))
            .into()
        })
    }

    pub fn require_account_id(&self) -> Result<u64> {
        self.account_id.ok_or_else(|| {
            ClientError::Configuration(format!(
                "no account id configured; set {ENV_ACCOUNT_ID} or pass --account-id"
            ))
        })
    }
}

fn parse_positive(var: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(StructuredError::with_context(
            ErrorCode::ValidationFailed,
            format!("{var} must be a positive integer, got \"{raw}\""),
            [("variable".to_string(), serde_json::Value::from(var))],
        )
        .into()),
    }
}
