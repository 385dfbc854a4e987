//! Client settings loader
//!
//! Loads [`ClientSettings`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file if one is present (existing variables win)
//! 2. Attempts to load from environment variables
//! 3. If `CORBEL_URL_BASE` is unset, falls back to loading from file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CORBEL_URL_BASE`: URL template, may contain `{{module}}` (required)
//! - `CORBEL_CLIENT_ID`, `CORBEL_CLIENT_SECRET`: client credentials
//! - `CORBEL_SCOPES`: space-separated scopes requested for tokens
//! - `CORBEL_AUDIENCE`: assertion audience
//! - `CORBEL_TIMEOUT_SECS`: transport timeout in seconds
//! - `CORBEL_MAX_ATTEMPTS`: attempts per exchange for network failures
//! - `CORBEL_<MODULE>_ENDPOINT` / `CORBEL_<MODULE>_PORT`: per-module
//!   overrides, e.g. `CORBEL_IAM_ENDPOINT`
//!
//! ## File Locations
//! The loader probes `corbel.{json,toml}` then `config/corbel.{json,toml}`
//! in the working directory, then the same names next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use corbel_domain::{ClientSettings, CorbelError, Module, Result};

use crate::errors::InfraError;

const FILE_NAMES: [&str; 4] =
    ["corbel.json", "corbel.toml", "config/corbel.json", "config/corbel.toml"];

/// Load settings with automatic fallback strategy
///
/// # Errors
/// Returns `CorbelError::Config` if settings cannot be loaded from either
/// source, a file is malformed or a variable has an invalid value.
pub fn load() -> Result<ClientSettings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    if std::env::var("CORBEL_URL_BASE").is_err() {
        tracing::debug!("CORBEL_URL_BASE not set, trying file");
        return load_from_file(None);
    }

    let settings = load_from_env()?;
    tracing::info!("Client settings loaded from environment variables");
    Ok(settings)
}

/// Load settings from environment variables
///
/// # Errors
/// Returns `CorbelError::Config` if `CORBEL_URL_BASE` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<ClientSettings> {
    let mut settings = ClientSettings::new(env_var("CORBEL_URL_BASE")?);
    settings.client_id = env_opt("CORBEL_CLIENT_ID");
    settings.client_secret = env_opt("CORBEL_CLIENT_SECRET");
    settings.scopes = env_opt("CORBEL_SCOPES");
    settings.audience = env_opt("CORBEL_AUDIENCE");

    if let Some(timeout) = env_parsed::<u64>("CORBEL_TIMEOUT_SECS")? {
        settings.transport.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parsed::<u32>("CORBEL_MAX_ATTEMPTS")? {
        settings.transport.max_attempts = attempts;
    }

    for module in Module::ALL {
        let prefix = format!("CORBEL_{}", module.as_str().to_ascii_uppercase());
        if let Some(endpoint) = env_opt(&format!("{prefix}_ENDPOINT")) {
            settings.endpoints.insert(module, endpoint);
        }
        if let Some(port) = env_parsed::<u16>(&format!("{prefix}_PORT"))? {
            settings.ports.insert(module, port);
        }
    }

    Ok(settings)
}

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `CorbelError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CorbelError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CorbelError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading client settings from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    parse_config(&contents, &config_path)
}

/// Parse settings, detecting the format by file extension.
///
/// # Errors
/// Returns `CorbelError::Config` if the format is unsupported or invalid.
pub fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(CorbelError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing settings file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| CorbelError::Config(format!("Missing required environment variable: {key}")))
}

/// Set and non-empty.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| CorbelError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
