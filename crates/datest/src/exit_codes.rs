//! Exit codes for the CLI

/// Every test file passed, or discovery-only finished
pub const SUCCESS: i32 = 0;

/// At least one test file failed
pub const TESTS_FAILED: i32 = 1;

/// Internal or configuration error
pub const INTERNAL_ERROR: i32 = 2;

/// The interpreter command is missing or does not answer `--version`
pub const INTERPRETER_UNAVAILABLE: i32 = 3;

/// Discovery found no test files
pub const NO_TESTS_FOUND: i32 = 4;

/// User cancelled
pub const CANCELLED: i32 = 130;
