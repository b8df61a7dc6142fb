//! Configuration file loading.
//!
//! The config file is TOML holding a [`SearchConfig`]. Its location is, in
//! order: the `--config` flag, `$PXFIND_CONFIG`, then
//! `<config dir>/pxfind/config.toml`. Missing keys take their defaults and a
//! missing default file means an all-default configuration.

use std::path::{Path, PathBuf};

use pxfind_core::{Error, Result};
use pxfind_fts::SearchConfig;

/// Name used for the config and data directories.
pub const PROJECT_NAME: &str = "pxfind";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PXFIND_CONFIG";

/// Default config file location for this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
}

/// Default index directory for this platform.
pub fn default_index_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(PROJECT_NAME).join("index"))
}

/// Resolve which config file to use.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    resolve_config_path_with(explicit, std::env::var(CONFIG_ENV_VAR).ok())
}

fn resolve_config_path_with(explicit: Option<&str>, env: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

/// Load the configuration.
///
/// # Errors
///
/// Returns `Error::NotFound` if a file was named explicitly (flag or
/// environment) and does not exist, and `Error::Config` if it does not
/// parse.
pub fn load_config(explicit: Option<&str>) -> Result<SearchConfig> {
    let env = std::env::var(CONFIG_ENV_VAR).ok().filter(|p| !p.is_empty());
    let named = explicit.is_some() || env.is_some();

    match resolve_config_path_with(explicit, env) {
        Some(path) if path.exists() => load_config_file(&path),
        Some(path) if named => Err(Error::not_found(
            path.to_string_lossy(),
            "config file",
        )),
        _ => {
            log::debug!("No config file found, using defaults");
            Ok(SearchConfig::default())
        }
    }
}

/// Load the configuration from a specific file.
pub fn load_config_file(path: &Path) -> Result<SearchConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let config: SearchConfig = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
    log::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Serialize a configuration as TOML.
pub fn to_toml_string(config: &SearchConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| Error::config(e.to_string()))
}

/// Pick the index directory: flag, then config, then the platform default.
pub fn resolve_index_path(flag: Option<&Path>, config: &SearchConfig) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.index_path {
        return Ok(PathBuf::from(path));
    }
    default_index_path().ok_or_else(|| Error::config("Could not determine data directory"))
}

/// Pick the catalogue directory: flag, then config.
pub fn resolve_catalogue_path(flag: Option<&Path>, config: &SearchConfig) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    config.catalogue_path.as_ref().map(PathBuf::from).ok_or_else(|| {
        Error::config("No catalogue path given; pass --catalogue or set catalogue_path")
    })
}

// ============================================================================
// Tests
// ============================================================================
