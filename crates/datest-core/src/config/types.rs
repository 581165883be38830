//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveryOptions;
use crate::executor::ExecutorOptions;

/// Main configuration for datest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Test discovery configuration
    pub discovery: DiscoveryConfig,

    /// Interpreter execution configuration
    pub execution: ExecutionConfig,

    /// Terminal output configuration
    pub output: OutputConfig,
}

/// Test discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File name patterns that mark a test file
    pub patterns: Vec<String>,

    /// Names to skip while walking directories
    pub exclude: Vec<String>,

    /// Whether to descend into subdirectories
    pub recursive: bool,

    /// Maximum directory depth below each root
    pub max_depth: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["test_*.na".to_string(), "*_test.na".to_string()],
            exclude: vec![
                ".*".to_string(),
                "__pycache__".to_string(),
                "*.egg-info".to_string(),
            ],
            recursive: true,
            max_depth: 10,
        }
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        DiscoveryOptions {
            patterns: config.patterns.clone(),
            exclude: config.exclude.clone(),
            recursive: config.recursive,
            max_depth: config.max_depth,
        }
    }
}

/// Interpreter execution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Interpreter command template
    pub command: String,

    /// Per-file timeout in seconds
    pub timeout: f64,

    /// Ask the interpreter for JSON output
    pub json_output: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            command: "dana".to_string(),
            timeout: 30.0,
            json_output: false,
        }
    }
}

impl ExecutionConfig {
    /// Timeout as a Duration. Call after validation.
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::from_secs(30))
    }
}

impl From<&ExecutionConfig> for ExecutorOptions {
    fn from(config: &ExecutionConfig) -> Self {
        ExecutorOptions {
            command: config.command.clone(),
            timeout: config.timeout_duration(),
            json_output: config.json_output,
        }
    }
}

/// Terminal output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show output of passing files too
    pub verbose: bool,

    /// Colored output
    pub color: bool,

    /// Show per-file timings
    pub timings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
            timings: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[execution]\ntimeout = 5.0\n").unwrap();

        assert_eq!(config.execution.timeout, 5.0);
        assert_eq!(config.execution.command, "dana");
        assert_eq!(config.discovery, DiscoveryConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let config: Config = toml::from_str("[pytest]\nenable = true\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_executor_options_from_config() {
        let execution = ExecutionConfig {
            command: "dana --strict".to_string(),
            timeout: 1.5,
            json_output: true,
        };
        let options = ExecutorOptions::from(&execution);

        assert_eq!(options.command, "dana --strict");
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert!(options.json_output);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
