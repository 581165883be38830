//! Core types for datest

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::classify;

/// Kind of signal extracted from interpreter output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionKind {
    /// A pass/fail check
    Assert,
    /// Informational log output, never a failure
    Log,
    /// An error reported on stderr
    Error,
    /// Synthetic whole-file verdict used when nothing more specific was found
    Result,
}

impl AssertionKind {
    /// Returns the string representation of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Log => "log",
            Self::Error => "error",
            Self::Result => "result",
        }
    }
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssertionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assert" => Ok(Self::Assert),
            "log" => Ok(Self::Log),
            "error" => Ok(Self::Error),
            "result" => Ok(Self::Result),
            _ => Err(format!("Unknown assertion kind: {}", s)),
        }
    }
}

/// One parsed signal from a test file's output
///
/// Constructed through the per-kind constructors so that logs always pass
/// and errors always fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assertion {
    line_number: u32,
    kind: AssertionKind,
    message: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_line: Option<String>,
}

impl Assertion {
    /// An `assert` entry. Line `0` means unknown.
    pub fn assert(line_number: u32, message: impl Into<String>, passed: bool) -> Self {
        Self {
            line_number,
            kind: AssertionKind::Assert,
            message: message.into(),
            passed,
            source_line: None,
        }
    }

    /// A `log` entry, always passed
    pub fn log(line_number: u32, message: impl Into<String>) -> Self {
        Self {
            line_number,
            kind: AssertionKind::Log,
            message: message.into(),
            passed: true,
            source_line: None,
        }
    }

    /// An `error` entry, always failed
    pub fn error(line_number: u32, message: impl Into<String>) -> Self {
        Self {
            line_number,
            kind: AssertionKind::Error,
            message: message.into(),
            passed: false,
            source_line: None,
        }
    }

    /// A synthetic `result` entry at line 0
    pub fn result(passed: bool) -> Self {
        let message = if passed { "Test passed" } else { "Test failed" };
        Self {
            line_number: 0,
            kind: AssertionKind::Result,
            message: message.to_string(),
            passed,
            source_line: None,
        }
    }

    /// Attach the source text the interpreter reported for this entry
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_line = Some(source.into());
        self
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn kind(&self) -> AssertionKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn source_line(&self) -> Option<&str> {
        self.source_line.as_deref()
    }

    /// Whether this is a failed `assert` entry
    pub fn is_failed_assert(&self) -> bool {
        self.kind == AssertionKind::Assert && !self.passed
    }
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.passed { "✅" } else { "❌" };
        write!(f, "{} Line {}: {}", status, self.line_number, self.message)
    }
}

/// Counts of `assert`-kind entries in one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssertionSummary {
    pub passed: usize,
    pub failed: usize,
}

/// Captured output of one interpreter process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Outcome of executing one test file
///
/// `success` is always derived: from the exit code and the parsed
/// assertions for a completed process, or `false` for a process that never
/// completed.
#[derive(Debug, Clone)]
pub struct FileResult {
    file: PathBuf,
    success: bool,
    duration: Duration,
    output: String,
    errors: String,
    exit_code: i32,
    assertions: Vec<Assertion>,
}

impl FileResult {
    /// Build the result of a process that ran to completion
    pub fn completed(
        file: impl Into<PathBuf>,
        duration: Duration,
        process: ProcessOutput,
        assertions: Vec<Assertion>,
    ) -> Self {
        let success = classify(process.exit_code, &assertions);
        Self {
            file: file.into(),
            success,
            duration,
            output: process.stdout,
            errors: process.stderr,
            exit_code: process.exit_code,
            assertions,
        }
    }

    /// Build the result of a process that failed to start or timed out.
    /// Such results carry no assertions and are never re-parsed.
    pub fn terminal(
        file: impl Into<PathBuf>,
        duration: Duration,
        errors: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self {
            file: file.into(),
            success: false,
            duration,
            output: String::new(),
            errors: errors.into(),
            exit_code,
            assertions: Vec::new(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Raw stdout, verbatim
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Raw stderr, verbatim
    pub fn errors(&self) -> &str {
        &self.errors
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    /// Passed assertions of any kind, in order
    pub fn passed_assertions(&self) -> Vec<&Assertion> {
        self.assertions.iter().filter(|a| a.passed()).collect()
    }

    /// Failed assertions of any kind, in order
    pub fn failed_assertions(&self) -> Vec<&Assertion> {
        self.assertions.iter().filter(|a| !a.passed()).collect()
    }

    /// File name without extension
    pub fn test_name(&self) -> String {
        self.file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file.display().to_string())
    }

    /// Whether the process wrote to stderr or exited non-zero
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.exit_code != 0
    }

    /// Pass/fail counts over `assert` entries only
    pub fn assertion_summary(&self) -> AssertionSummary {
        crate::summary::assertion_summary(&self.assertions)
    }

    /// One-line summary, e.g. `test_math: PASSED (3/4 assertions, 0.12s)`
    pub fn summary(&self) -> String {
        let status = if self.success { "PASSED" } else { "FAILED" };
        format!(
            "{}: {} ({}/{} assertions, {:.2}s)",
            self.test_name(),
            status,
            self.passed_assertions().len(),
            self.assertions.len(),
            self.duration.as_secs_f64()
        )
    }
}
