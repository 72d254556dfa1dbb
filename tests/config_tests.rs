//! Tests for configuration layering against the real process environment.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use supportdesk::config::{
    Config, DEFAULT_BASE_URL, ENV_ACCOUNT_ID, ENV_API_TOKEN, ENV_BASE_URL, ENV_TIMEOUT_SECS,
};
use supportdesk::error::{ClientError, ErrorCode};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 4] = [ENV_BASE_URL, ENV_API_TOKEN, ENV_ACCOUNT_ID, ENV_TIMEOUT_SECS];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clear_config_env() {
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn env_overrides_file() {
    let _lock = env_lock_guard();
    let _env = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "base_url = \"https://file.example/\"\napi_token = \"file-token\"\naccount_id = 3\n",
    );
    std::env::set_var(ENV_API_TOKEN, "env-token");
    std::env::set_var(ENV_TIMEOUT_SECS, "5");

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.base_url(), "https://file.example");
    assert_eq!(config.api_token(), Some("env-token"));
    assert_eq!(config.account_id(), Some(3));
    assert_eq!(config.timeout(), Duration::from_secs(5));
}

#[test]
fn blank_env_values_are_ignored() {
    let _lock = env_lock_guard();
    let _env = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "account_id = 8\n");
    std::env::set_var(ENV_ACCOUNT_ID, "  ");
    std::env::set_var(ENV_BASE_URL, "");

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.account_id(), Some(8));
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn invalid_account_id_is_validation_failure() {
    let _lock = env_lock_guard();
    let _env = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();
    std::env::set_var(ENV_ACCOUNT_ID, "abc");

    let err = Config::new().apply_env().unwrap_err();
    let structured = err.to_structured();
    assert_eq!(structured.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        structured.context().get("variable"),
        Some(&serde_json::json!(ENV_ACCOUNT_ID))
    );
}

#[test]
fn explicit_settings_override_env() {
    let _lock = env_lock_guard();
    let _env = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();
    std::env::set_var(ENV_ACCOUNT_ID, "4");

    let config = Config::new().apply_env().unwrap().with_account_id(11);
    assert_eq!(config.account_id(), Some(11));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}

#[test]
fn malformed_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "account_id = \"not a number\"\n");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}

#[test]
fn save_round_trips_and_hides_token_in_debug() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config::new()
        .with_base_url("https://desk.example")
        .with_api_token("secret")
        .with_account_id(2)
        .with_timeout(Duration::from_secs(12));

    config.save(&path).unwrap();
    assert_eq!(Config::from_file(&path).unwrap(), config);
    assert!(!format!("{config:?}").contains("secret"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn require_helpers_report_missing_values() {
    let config = Config::new();
    assert_eq!(config.require_token().unwrap_err().code(), ErrorCode::Unauthorized);
    assert!(matches!(
        config.require_account_id().unwrap_err(),
        ClientError::Configuration(_)
    ));
}
