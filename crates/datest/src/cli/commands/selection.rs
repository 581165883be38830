//! Test selection shared by `run` and `discover`

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{debug, info};

use datest_core::config::{load_config, load_config_or_default, validate_config, Config};
use datest_core::TestDiscovery;

use crate::cli::Program;

/// Directory searched when no paths are given, if it exists
pub const DEFAULT_TEST_DIR: &str = "tests";

/// Which test files to operate on
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Test files or directories (default: tests/ if present, else .)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Test file pattern, repeatable (overrides configured patterns)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub pattern: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SelectionArgs {
    /// Load configuration and apply the pattern override.
    ///
    /// An explicit `--config` that fails to load is an error. A discovered
    /// configuration that fails to load falls back to defaults.
    pub fn load_config(&self, program: Program) -> anyhow::Result<Config> {
        let mut config = if let Some(ref path) = self.config {
            load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        } else if program.discovers_config() {
            let cwd = std::env::current_dir()?;
            let (config, path) = load_config_or_default(&cwd);
            if let Some(path) = path {
                info!(path = %path.display(), "using config file");
            }
            config
        } else {
            Config::default()
        };

        if !self.pattern.is_empty() {
            config.discovery.patterns = self.pattern.clone();
        }
        validate_config(&config)?;
        Ok(config)
    }

    /// Paths to search, defaulting to `tests/` when it exists and `.` otherwise
    pub fn resolve_paths(&self) -> Vec<PathBuf> {
        if !self.paths.is_empty() {
            return self.paths.clone();
        }
        let default = Path::new(DEFAULT_TEST_DIR);
        if default.exists() {
            vec![default.to_path_buf()]
        } else {
            vec![PathBuf::from(".")]
        }
    }

    /// Discover test files with the given configuration
    pub fn discover(&self, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
        let paths = self.resolve_paths();
        debug!(paths = ?paths, "discovering test files");
        let discovery = TestDiscovery::new((&config.discovery).into())?;
        Ok(discovery.discover(&paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_paths_kept() {
        let args = SelectionArgs {
            paths: vec![PathBuf::from("a.na"), PathBuf::from("dir")],
            ..Default::default()
        };
        assert_eq!(args.resolve_paths(), args.paths);
    }

    #[test]
    fn test_pattern_override() {
        let args = SelectionArgs {
            pattern: vec!["check_*.na".to_string()],
            ..Default::default()
        };
        let config = args.load_config(Program::Natest).unwrap();
        assert_eq!(config.discovery.patterns, vec!["check_*.na"]);
    }

    #[test]
    fn test_explicit_config_errors_are_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("datest.toml");
        std::fs::write(&path, "[execution]\ncommand = \"\"\n").unwrap();

        let args = SelectionArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(args.load_config(Program::Datest).is_err());
    }

    #[test]
    fn test_explicit_config_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "[execution]\ncommand = \"dana-nightly\"\n").unwrap();

        let args = SelectionArgs {
            config: Some(path),
            ..Default::default()
        };
        let config = args.load_config(Program::Natest).unwrap();
        assert_eq!(config.execution.command, "dana-nightly");
    }

    #[test]
    fn test_discover_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("test_one.na"), "").unwrap();
        std::fs::write(temp.path().join("helper.na"), "").unwrap();

        let args = SelectionArgs {
            paths: vec![temp.path().to_path_buf()],
            ..Default::default()
        };
        let files = args.discover(&Config::default()).unwrap();
        assert_eq!(files, vec![temp.path().join("test_one.na")]);
    }
}
