//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::{config_file_names, PYPROJECT_TOML};
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file.
///
/// A `pyproject.toml` is read through its `[tool.datest]` table; any other
/// file is a datest TOML document.
pub fn load_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config = if is_pyproject(path) {
        let document: toml::Table = toml::from_str(&content).map_err(ConfigError::TomlError)?;
        let section = tool_section(&document)
            .ok_or_else(|| ConfigError::MissingToolSection(path.to_path_buf()))?;
        section
            .clone()
            .try_into::<Config>()
            .map_err(ConfigError::TomlError)?
    } else {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks, in order:
///   1. `datest.toml`
///   2. `.datest.toml`
///   3. `pyproject.toml`, only if it has a `[tool.datest]` table
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        let pyproject = current.join(PYPROJECT_TOML);
        if pyproject.is_file() && has_tool_section(&pyproject) {
            info!(path = %pyproject.display(), "found [tool.datest] in pyproject.toml");
            return Some(pyproject);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(crate::DatestError::Config(ConfigError::NotFound(_))) => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            (Config::default(), None)
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not load config, using defaults");
            (Config::default(), None)
        }
    }
}

fn is_pyproject(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == PYPROJECT_TOML)
}

fn tool_section(document: &toml::Table) -> Option<&toml::Value> {
    document.get("tool")?.get("datest")
}

fn has_tool_section(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .is_some_and(|document| tool_section(&document).is_some())
}
