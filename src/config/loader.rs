// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{GroupConfig, RawGroupConfig};
use crate::config::validate::validate_groups;
use crate::errors::{CmdGroupError, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CMDGROUP_CONFIG_DIR";

/// Read one group file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGroupConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: RawGroupConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Read and validate one group file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GroupConfig> {
    let raw = load_from_path(&path)?;
    GroupConfig::try_from(raw)
}

/// Load every `*.toml` file in `dir`, sorted by file name.
///
/// Each file is validated on its own, then the set is checked for clashing
/// group names.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<GroupConfig>> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut groups = Vec::with_capacity(paths.len());
    for path in paths {
        debug!(path = %path.display(), "loading group config");
        let group = load_and_validate(&path).map_err(|e| {
            CmdGroupError::ConfigError(format!("invalid config {}: {e}", path.display()))
        })?;
        groups.push(group);
    }

    validate_groups(&groups)?;
    Ok(groups)
}

/// Default location of group configs: `$CMDGROUP_CONFIG_DIR`, else
/// `<config dir>/cmdgroup` (e.g. `~/.config/cmdgroup`), else `./cmdgroup`.
pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|d| d.join("cmdgroup"))
        .unwrap_or_else(|| PathBuf::from("cmdgroup"))
}
