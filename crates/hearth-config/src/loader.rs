//! Config file discovery and loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Start from built-in defaults
//! 2. Merge the TOML file (explicit path, `$HEARTH_CONFIG`, or
//!    `~/.hearth/config.toml`)
//! 3. Apply environment overrides for individual fields
//! 4. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Load the configuration.
///
/// With `path = None` the file is discovered from `$HEARTH_CONFIG`, then
/// `~/.hearth/config.toml`. A missing discovered file is not an error
/// (defaults plus environment overrides apply); a missing explicit `path`
/// is.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
/// the final configuration fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
    let env_vars: HashMap<String, String> = std::env::vars().collect();
    load_with_env(path, &env_vars)
}

fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(explicit) => read_file(explicit)?,
        None => match discover(env) {
            Some(discovered) if discovered.exists() => read_file(&discovered)?,
            Some(discovered) => {
                debug!(path = %discovered.display(), "no config file found, using defaults");
                Config::default()
            },
            None => Config::default(),
        },
    };

    apply_env_overrides(&mut config, env)?;
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<Config> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|source| ConfigError::ParseError {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn discover(env: &HashMap<String, String>) -> Option<PathBuf> {
    if let Some(explicit) = env.get("HEARTH_CONFIG") {
        return Some(PathBuf::from(explicit));
    }
    directories::UserDirs::new().map(|dirs| dirs.home_dir().join(".hearth").join("config.toml"))
}

fn apply_env_overrides(config: &mut Config, env: &HashMap<String, String>) -> ConfigResult<()> {
    if let Some(raw) = env.get("HEARTH_APPROVAL_TIMEOUT_SECS") {
        config.approval.timeout_secs =
            raw.parse().map_err(|_| ConfigError::ValidationError {
                field: "approval.timeout_secs".to_owned(),
                message: format!("HEARTH_APPROVAL_TIMEOUT_SECS is not a number: {raw}"),
            })?;
    }
    if let Some(path) = env.get("HEARTH_AUDIT_PATH") {
        config.audit.path = Some(path.clone());
    }
    if let Some(token) = env.get("HEARTH_TELEGRAM_BOT_TOKEN") {
        config.telegram.bot_token = Some(token.clone());
    }
    if let Some(raw) = env.get("HEARTH_TELEGRAM_CHAT_ID") {
        config.telegram.chat_id =
            Some(raw.parse().map_err(|_| ConfigError::ValidationError {
                field: "telegram.chat_id".to_owned(),
                message: format!("HEARTH_TELEGRAM_CHAT_ID is not a number: {raw}"),
            })?);
    }
    if let Some(level) = env.get("HEARTH_LOG") {
        config.logging.level = level.clone();
    }
    Ok(())
}

fn validate(config: &Config) -> ConfigResult<()> {
    if config.approval.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "approval.timeout_secs".to_owned(),
            message: "must be greater than zero".to_owned(),
        });
    }
    if config.telegram.bot_token.is_some() != config.telegram.chat_id.is_some() {
        return Err(ConfigError::ValidationError {
            field: "telegram".to_owned(),
            message: "bot_token and chat_id must be set together".to_owned(),
        });
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    Ok(())
}
