//! Run command - discover and execute test files

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing::{info, warn};

use datest_core::config::{validate_config, Config};
use datest_core::summary::summarize;
use datest_core::{FileResult, ReportGenerator, TestExecutor};

use super::discover::print_discovery;
use super::SelectionArgs;
use crate::cli::output::{self, report::PrettyReporter};
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Discover and run test files
#[derive(Debug, Clone, Default, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only discover test files, don't execute them
    #[arg(long)]
    pub discover_only: bool,

    /// Ask the interpreter for JSON output
    #[arg(long)]
    pub json: bool,

    /// Timeout for each test file in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Output format for test results
    #[arg(long, default_value = "pretty")]
    pub reporter: ReporterArg,

    /// Write the report to a file (e.g. junit.xml)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Reporter output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReporterArg {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// JUnit XML output
    Junit,
}

impl RunCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<i32> {
        let mut config = self.selection.load_config(cli.program)?;
        self.apply_overrides(&mut config, cli.verbose)?;
        output::apply_color_setting(config.output.color);

        let files = self.selection.discover(&config)?;
        if files.is_empty() {
            output::warning("No test files found");
            if !cli.quiet {
                eprintln!();
                eprintln!("{}", no_tests_tip(&config));
            }
            return Ok(exit_codes::NO_TESTS_FOUND);
        }

        if self.discover_only {
            print_discovery(&files, cli)?;
            return Ok(exit_codes::SUCCESS);
        }

        let reporter = self.effective_reporter(cli);
        let console = !cli.quiet && (reporter == ReporterArg::Pretty || self.output.is_some());
        if console && config.output.verbose {
            output::discovered_files(&files);
        }

        let executor = TestExecutor::new((&config.execution).into())?;
        if !executor.is_available().await {
            warn!(command = %config.execution.command, "interpreter unavailable");
            output::warning(&format!(
                "Interpreter '{}' is not available. Test files were discovered but not executed.",
                executor.program()
            ));
            output::warning(
                "Install the interpreter or set [execution] command in datest.toml to run tests.",
            );
            if console {
                output::discovered_files(&files);
            }
            return Ok(exit_codes::INTERPRETER_UNAVAILABLE);
        }

        let pretty = PrettyReporter::new(config.output.verbose, config.output.timings);
        if console {
            print!("{}", pretty.header(files.len()));
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = cancel_tx.send(true);
            }
        });

        let run = run_until_cancelled(&executor, &files, cancel_rx, console, &pretty);
        let Some(results) = run.await else {
            eprintln!("\n\nInterrupted by user");
            return Ok(exit_codes::CANCELLED);
        };

        if console {
            print!("{}", pretty.render_summary(&results));
        }

        let machine = machine_report(reporter, &results)?;
        if let Some(ref path) = self.output {
            let content = machine.unwrap_or_else(|| {
                console::strip_ansi_codes(&pretty.render(&results)).to_string()
            });
            ReportGenerator::write_to_file(&content, path)?;
            if !cli.quiet && cli.format == OutputFormat::Text {
                output::success(&format!(
                    "Report written to {}",
                    output::path_style().apply_to(path.display())
                ));
            }
        } else if let Some(content) = machine {
            println!("{}", content);
        }

        let summary = summarize(&results);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "run finished"
        );
        Ok(if summary.success() {
            exit_codes::SUCCESS
        } else {
            exit_codes::TESTS_FAILED
        })
    }

    /// Apply command line flags on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config, verbose: bool) -> anyhow::Result<()> {
        if verbose {
            config.output.verbose = true;
        }
        if self.json {
            config.execution.json_output = true;
        }
        if let Some(timeout) = self.timeout {
            config.execution.timeout = timeout;
        }
        if self.no_color {
            config.output.color = false;
        }
        validate_config(config)?;
        Ok(())
    }

    /// `--format json` selects the JSON reporter
    fn effective_reporter(&self, cli: &Cli) -> ReporterArg {
        if cli.format == OutputFormat::Json {
            ReporterArg::Json
        } else {
            self.reporter
        }
    }
}

fn no_tests_tip(config: &Config) -> String {
    let patterns = config
        .discovery
        .patterns
        .iter()
        .map(|p| format!("'{}'", p))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("Tip: Ensure test files match patterns like {}", patterns)
}

/// Run files one at a time. Returns `None` once `cancel` turns true; the
/// running interpreter is killed and no further files start. A closed
/// channel never cancels.
async fn run_until_cancelled(
    executor: &TestExecutor,
    files: &[PathBuf],
    mut cancel: watch::Receiver<bool>,
    console: bool,
    pretty: &PrettyReporter,
) -> Option<Vec<FileResult>> {
    let progress = spinner(console);

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        progress.set_message(format!("Running {}", display_name(file)));

        let result = tokio::select! {
            result = executor.run_file(file) => result,
            Ok(_) = cancel.wait_for(|cancelled| *cancelled) => {
                progress.finish_and_clear();
                warn!(file = %file.display(), "run cancelled");
                return None;
            }
        };

        if console {
            progress.suspend(|| print!("{}", pretty.render_file(&result)));
        }
        results.push(result);
    }

    progress.finish_and_clear();
    Some(results)
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string())
}

/// Machine-readable report content, `None` for the pretty reporter
fn machine_report(
    reporter: ReporterArg,
    results: &[FileResult],
) -> anyhow::Result<Option<String>> {
    Ok(match reporter {
        ReporterArg::Pretty => None,
        ReporterArg::Json => Some(ReportGenerator::generate_json(results)?),
        ReporterArg::Junit => Some(ReportGenerator::generate_junit(results)),
    })
}
