//! CLI definition and command handling

pub mod commands;
pub mod logging;
pub mod output;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{CompletionsCommand, DiscoverCommand, InitCommand, RunCommand};

use crate::exit_codes;

/// Datest - Test runner for Dana `.na` files
///
/// Discovers test files, runs each through the interpreter and reports
/// per-file pass/fail results.
#[derive(Debug, Parser)]
#[command(name = "datest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default `run` action
    #[command(flatten)]
    pub run: RunCommand,

    /// Which binary was invoked
    #[arg(skip)]
    pub program: Program,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover and run test files (the default)
    Run(RunCommand),

    /// List test files without running them
    Discover(DiscoverCommand),

    /// Create a datest.toml configuration file
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// The binary the CLI runs as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Program {
    /// Full runner, searches for configuration files
    #[default]
    Datest,
    /// Legacy name, built-in defaults unless `--config` is given
    Natest,
}

impl Program {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Datest => "datest",
            Self::Natest => "natest",
        }
    }

    /// Whether configuration files are searched for automatically
    pub fn discovers_config(&self) -> bool {
        matches!(self, Self::Datest)
    }
}

impl Cli {
    /// Parse process arguments under the given program name
    pub fn parse_for(program: Program) -> Self {
        let matches = Self::command()
            .name(program.name())
            .bin_name(program.name())
            .get_matches();
        let mut cli = Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
        cli.program = program;
        cli
    }

    /// Execute the CLI command, returning the process exit code
    pub fn execute(self) -> anyhow::Result<i32> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Some(Commands::Run(ref cmd)) => cmd.execute(&self),
            Some(Commands::Discover(ref cmd)) => cmd.execute(&self),
            Some(Commands::Init(ref cmd)) => cmd.execute(&self).map(|()| exit_codes::SUCCESS),
            Some(Commands::Completions(ref cmd)) => {
                cmd.execute(&self).map(|()| exit_codes::SUCCESS)
            }
            None => self.run.execute(&self),
        }
    }
}

/// Parse arguments, run the command and map the outcome to an exit code
pub fn run(program: Program) -> i32 {
    let cli = Cli::parse_for(program);
    let _guard = logging::init_tracing(program, cli.verbose);

    match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            output::error(&format!("{:#}", e));
            exit_codes::INTERNAL_ERROR
        }
    }
}
