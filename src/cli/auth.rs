//! CLI auth command handlers for login, status, and logout.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::output;
use super::{AuthCommands, GlobalArgs};
use crate::config::Config;
use crate::error::Result;

/// Dispatch `supportdesk auth <command>`.
pub fn handle(command: AuthCommands, global: &GlobalArgs) -> Result<()> {
    match command {
        AuthCommands::Login => handle_login(global),
        AuthCommands::Status => handle_status(global),
        AuthCommands::Logout => handle_logout(global),
    }
}

fn config_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(Config::default_path)
}

fn stored_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::from_file(path)
    } else {
        Ok(Config::new())
    }
}

/// Handle `supportdesk auth login`: persist the connection flags.
pub fn handle_login(global: &GlobalArgs) -> Result<()> {
    let path = config_path(global);
    let config = super::commands::apply_flags(stored_config(&path)?, global);
    config.require_token()?;
    config.save(&path)?;
    tracing::debug!(path = %path.display(), "saved credentials");

    output::print(
        global.output,
        &json!({
            "saved": path.display().to_string(),
            "base_url": config.base_url(),
            "account_id": config.account_id(),
        }),
    )
}

/// Handle `supportdesk auth status`: show every resolved layer without the secret.
pub fn handle_status(global: &GlobalArgs) -> Result<()> {
    let config = super::commands::resolve_config(global)?;
    output::print(
        global.output,
        &json!({
            "base_url": config.base_url(),
            "account_id": config.account_id(),
            "token": if config.api_token().is_some() { "set" } else { "missing" },
            "timeout_secs": config.timeout().as_secs(),
        }),
    )
}

/// Handle `supportdesk auth logout`: drop the token, keep the rest.
pub fn handle_logout(global: &GlobalArgs) -> Result<()> {
    let path = config_path(global);
    if !path.exists() {
        return output::print(global.output, &json!({ "removed": false }));
    }
    let config = Config::from_file(&path)?.without_api_token();
    config.save(&path)?;
    output::print(global.output, &json!({ "removed": true }))
}
