//! Discover command - list test files without running them

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::SelectionArgs;
use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// List test files without running them
#[derive(Debug, Clone, Default, Args)]
pub struct DiscoverCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl DiscoverCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        let config = self.selection.load_config(cli.program)?;
        let files = self.selection.discover(&config)?;
        info!(count = files.len(), "executing discover command");

        if files.is_empty() {
            if cli.format == OutputFormat::Json {
                print_discovery(&files, cli)?;
            } else {
                output::warning("No test files found");
            }
            return Ok(exit_codes::NO_TESTS_FOUND);
        }

        print_discovery(&files, cli)?;
        Ok(exit_codes::SUCCESS)
    }
}

/// Print discovered files as text or as a JSON array of paths
pub(super) fn print_discovery(files: &[PathBuf], cli: &Cli) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        let paths: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    if cli.quiet {
        for file in files {
            println!("{}", file.display());
        }
        return Ok(());
    }

    output::discovered_files(files);
    println!("Discovery complete: {} test file(s) found", files.len());
    Ok(())
}
