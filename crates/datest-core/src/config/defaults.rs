//! Default configuration values

/// Default configuration file name
pub const DEFAULT_CONFIG_TOML: &str = "datest.toml";

/// Hidden configuration file name
pub const ALT_CONFIG_TOML: &str = ".datest.toml";

/// Project manifest that may carry a `[tool.datest]` table
pub const PYPROJECT_TOML: &str = "pyproject.toml";

/// Get list of dedicated config file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![DEFAULT_CONFIG_TOML, ALT_CONFIG_TOML]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# datest.toml - Configuration for the datest test runner

[discovery]
# Patterns for test file discovery
patterns = ["test_*.na", "*_test.na"]
# Names to skip while walking directories
exclude = [".*", "__pycache__", "*.egg-info"]
# Recursively search directories
recursive = true
# Maximum directory depth for recursive search
max_depth = 10

[execution]
# Interpreter command; "{file}" marks where the test path goes
command = "dana"
# Timeout for each test file (seconds)
timeout = 30.0
# Ask the interpreter for JSON output
json_output = false

[output]
# Show output for passing files too
verbose = false
# Use colored output
color = true
# Show test execution timings
timings = true
"#;
