//! Datest Core - Core library for the Dana test runner
//!
//! This crate provides test discovery, interpreter execution, output
//! parsing, pass/fail classification, configuration and report generation
//! for `.na` test files.

pub mod classify;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod parser;
pub mod report;
pub mod summary;
pub mod types;

pub use classify::classify;
pub use config::{find_config, load_config, load_config_or_default, Config};
pub use discovery::{DiscoveryOptions, TestDiscovery};
pub use error::{ConfigError, DatestError, DiscoveryError, ExecutionError, Result};
pub use executor::{ExecutorOptions, TestExecutor};
pub use parser::{Indicators, OutputParser};
pub use report::ReportGenerator;
pub use summary::{summarize, RunSummary};
pub use types::{Assertion, AssertionKind, AssertionSummary, FileResult, ProcessOutput};
