//! Interpreter execution
//!
//! Runs each test file through the configured interpreter command, one at a
//! time, and turns the captured output into a [`FileResult`].

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error, info, instrument};

use crate::classify::{EXIT_COMMAND_NOT_FOUND, EXIT_EXECUTION_ERROR, EXIT_TIMEOUT};
use crate::error::{ExecutionError, Result};
use crate::parser::OutputParser;
use crate::types::{FileResult, ProcessOutput};

/// Token in the command template replaced by the test file path
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Flag asking the interpreter for structured output
pub const JSON_OUTPUT_FLAG: &str = "--output-json";

/// How long the availability check may take
const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Options controlling interpreter execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Command template, split on whitespace
    pub command: String,
    /// Per-file timeout
    pub timeout: Duration,
    /// Pass the structured output flag to the interpreter
    pub json_output: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            command: "dana".to_string(),
            timeout: Duration::from_secs(30),
            json_output: false,
        }
    }
}

/// Runs test files through the interpreter
#[derive(Debug, Clone)]
pub struct TestExecutor {
    options: ExecutorOptions,
    program: String,
    args: Vec<String>,
    parser: OutputParser,
}

impl TestExecutor {
    /// Create an executor. Fails when the command template is blank.
    pub fn new(options: ExecutorOptions) -> Result<Self> {
        let mut parts = options.command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ExecutionError::EmptyCommand)?;
        let args = parts.collect();

        debug!(program = %program, timeout = ?options.timeout, "initialized executor");
        Ok(Self {
            options,
            program,
            args,
            parser: OutputParser::new(),
        })
    }

    /// Use a custom output parser
    pub fn with_parser(mut self, parser: OutputParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Interpreter program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list for running `file`
    pub fn build_args(&self, file: &Path) -> Vec<String> {
        let file_arg = file.to_string_lossy().to_string();
        let mut args = Vec::with_capacity(self.args.len() + 2);
        let mut placed = false;

        for arg in &self.args {
            if arg == FILE_PLACEHOLDER {
                if self.options.json_output {
                    args.push(JSON_OUTPUT_FLAG.to_string());
                }
                args.push(file_arg.clone());
                placed = true;
            } else {
                args.push(arg.clone());
            }
        }

        if !placed {
            if self.options.json_output {
                args.push(JSON_OUTPUT_FLAG.to_string());
            }
            args.push(file_arg);
        }

        args
    }

    /// Execute one test file. Never fails: spawn errors and timeouts become
    /// failed results with conventional exit codes.
    #[instrument(skip(self, file), fields(file = %file.display()))]
    pub async fn run_file(&self, file: &Path) -> FileResult {
        info!("executing test file");
        let start = Instant::now();

        let target = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
        let working_dir = working_dir(&target);
        let args = self.build_args(&target);
        debug!(program = %self.program, args = ?args, cwd = %working_dir.display(), "spawning interpreter");

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return self.spawn_failure(file, start.elapsed(), e),
        };

        match tokio::time::timeout(self.options.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let duration = start.elapsed();
                let process = ProcessOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    exit_code: exit_code(output.status),
                };
                debug!(
                    exit_code = process.exit_code,
                    duration_ms = duration.as_millis() as u64,
                    "interpreter finished"
                );
                let assertions = self.parser.parse(&process.stdout, &process.stderr);
                FileResult::completed(file, duration, process, assertions)
            }
            Ok(Err(e)) => {
                error!(error = %e, "failed waiting for interpreter");
                FileResult::terminal(
                    file,
                    start.elapsed(),
                    format!("Execution error: {}", e),
                    EXIT_EXECUTION_ERROR,
                )
            }
            Err(_) => {
                let seconds = self.options.timeout.as_secs_f64();
                error!(timeout_secs = seconds, "execution timed out");
                FileResult::terminal(
                    file,
                    start.elapsed(),
                    format!("Execution timed out after {}s", seconds),
                    EXIT_TIMEOUT,
                )
            }
        }
    }

    /// Execute files strictly one after another, in order
    pub async fn run_files(&self, files: &[PathBuf]) -> Vec<FileResult> {
        info!(count = files.len(), "running test files");
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.run_file(file).await);
        }
        results
    }

    /// Whether the interpreter resolves on PATH and answers `--version`
    pub async fn is_available(&self) -> bool {
        if which::which(&self.program).is_err() {
            debug!(program = %self.program, "interpreter not found on PATH");
            return false;
        }

        let check = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(VERSION_CHECK_TIMEOUT, check).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(program = %self.program, error = %e, "version check failed");
                false
            }
            Err(_) => {
                debug!(program = %self.program, "version check timed out");
                false
            }
        }
    }

    fn spawn_failure(&self, file: &Path, duration: Duration, e: std::io::Error) -> FileResult {
        if e.kind() == std::io::ErrorKind::NotFound {
            error!(program = %self.program, "interpreter command not found");
            FileResult::terminal(
                file,
                duration,
                format!("Interpreter command not found: {}", self.program),
                EXIT_COMMAND_NOT_FOUND,
            )
        } else {
            error!(error = %e, "failed to start interpreter");
            FileResult::terminal(
                file,
                duration,
                format!("Execution error: {}", e),
                EXIT_EXECUTION_ERROR,
            )
        }
    }
}

fn working_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn executor(command: &str, json_output: bool) -> TestExecutor {
        TestExecutor::new(ExecutorOptions {
            command: command.to_string(),
            timeout: Duration::from_secs(10),
            json_output,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_command_rejected() {
        let result = TestExecutor::new(ExecutorOptions {
            command: "  ".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_build_args_appends_file() {
        let exec = executor("dana --strict", false);
        assert_eq!(exec.program(), "dana");
        assert_eq!(
            exec.build_args(Path::new("/t/test_a.na")),
            vec!["--strict", "/t/test_a.na"]
        );
    }

    #[test]
    fn test_build_args_json_flag() {
        let exec = executor("dana", true);
        assert_eq!(
            exec.build_args(Path::new("test_a.na")),
            vec![JSON_OUTPUT_FLAG, "test_a.na"]
        );
    }

    #[test]
    fn test_build_args_placeholder() {
        let exec = executor("python -m dana {file} --quiet", true);
        assert_eq!(exec.program(), "python");
        assert_eq!(
            exec.build_args(Path::new("test_a.na")),
            vec!["-m", "dana", JSON_OUTPUT_FLAG, "test_a.na", "--quiet"]
        );
    }

    #[test]
    fn test_working_dir() {
        assert_eq!(working_dir(Path::new("/t/test_a.na")), PathBuf::from("/t"));
        assert_eq!(working_dir(Path::new("test_a.na")), PathBuf::from("."));
    }

    #[cfg(unix)]
    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_passing_file() {
        let temp = TempDir::new().unwrap();
        let file = script(&temp, "test_ok.na", "echo '✅ Test 1 passed'\necho 'log(\"done\")'\n");

        let result = executor("sh", false).run_file(&file).await;
        assert!(result.success());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.file(), file.as_path());
        assert_eq!(result.assertions().len(), 2);
        assert_eq!(result.output(), "✅ Test 1 passed\nlog(\"done\")\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_in_file_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("fixture.txt"), "✅ fixture found").unwrap();
        let file = script(&temp, "test_cwd.na", "cat fixture.txt\n");

        let result = executor("sh", false).run_file(&file).await;
        assert!(result.success(), "{}", result.errors());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_failing_exit_code() {
        let temp = TempDir::new().unwrap();
        let file = script(&temp, "test_fail.na", "echo 'Error: boom' >&2\nexit 3\n");

        let result = executor("sh", false).run_file(&file).await;
        assert!(!result.success());
        assert_eq!(result.exit_code(), 3);
        assert_eq!(result.errors(), "Error: boom\n");
        assert_eq!(result.assertions()[0].message(), "Error: boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let temp = TempDir::new().unwrap();
        let file = script(&temp, "test_slow.na", "sleep 5\n");

        let exec = TestExecutor::new(ExecutorOptions {
            command: "sh".to_string(),
            timeout: Duration::from_millis(200),
            json_output: false,
        })
        .unwrap();
        let result = exec.run_file(&file).await;

        assert!(!result.success());
        assert_eq!(result.exit_code(), EXIT_TIMEOUT);
        assert_eq!(result.errors(), "Execution timed out after 0.2s");
        assert!(result.assertions().is_empty());
        assert!(result.duration() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_interpreter() {
        let temp = TempDir::new().unwrap();
        let file = script(&temp, "test_a.na", "");

        let exec = executor("datest-no-such-interpreter", false);
        let result = exec.run_file(&file).await;

        assert_eq!(result.exit_code(), EXIT_COMMAND_NOT_FOUND);
        assert_eq!(
            result.errors(),
            "Interpreter command not found: datest-no-such-interpreter"
        );
        assert!(!exec.is_available().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_killed_by_signal() {
        let temp = TempDir::new().unwrap();
        let file = script(&temp, "test_kill.na", "kill -9 $$\n");

        let result = executor("sh", false).run_file(&file).await;
        assert!(!result.success());
        assert_eq!(result.exit_code(), -9);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_files_in_order() {
        let temp = TempDir::new().unwrap();
        let first = script(&temp, "test_b.na", "echo ok\n");
        let second = script(&temp, "test_a.na", "exit 1\n");

        let results = executor("sh", false)
            .run_files(&[first.clone(), second.clone()])
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].file(), first.as_path());
        assert!(results[0].success());
        assert_eq!(results[1].file(), second.as_path());
        assert!(!results[1].success());
    }
}
