//! File-level pass/fail classification

use crate::types::Assertion;

/// Exit code assigned when the interpreter exceeded its timeout
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code assigned when the interpreter command could not be found
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Exit code assigned when the interpreter could not be run for another reason
pub const EXIT_EXECUTION_ERROR: i32 = 2;

/// Decide whether a test file passed.
///
/// A file passes when the process exited `0` and no `assert` entry failed.
/// `log`, `error` and `result` entries do not affect the verdict, so a file
/// whose stderr only produced `error` entries still passes on exit `0`.
pub fn classify(exit_code: i32, assertions: &[Assertion]) -> bool {
    exit_code == 0 && !assertions.iter().any(Assertion::is_failed_assert)
}
