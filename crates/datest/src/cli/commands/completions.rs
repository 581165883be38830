//! Shell completion scripts for `datest` and `natest`

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use tracing::info;

use crate::cli::output;
use crate::cli::Cli;

/// Print or save a completion script for the invoked binary
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let bin_name = cli.program.name();
        info!(shell = %self.shell, bin = bin_name, "generating completions");

        let mut cmd = Cli::command().name(bin_name);
        match self.output {
            Some(ref path) => {
                let mut file = std::fs::File::create(path)?;
                clap_complete::generate(self.shell, &mut cmd, bin_name, &mut file);
                if !cli.quiet {
                    output::success(&format!(
                        "Completions written to {}",
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            None => {
                clap_complete::generate(self.shell, &mut cmd, bin_name, &mut std::io::stdout())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Commands, Program};
    use clap::Parser;
    use tempfile::TempDir;

    fn shell_arg(args: &[&str]) -> Shell {
        match Cli::try_parse_from(args).unwrap().command {
            Some(Commands::Completions(cmd)) => cmd.shell,
            other => panic!("expected completions, got {:?}", other),
        }
    }

    #[test]
    fn test_shell_names() {
        assert_eq!(shell_arg(&["datest", "completions", "zsh"]), Shell::Zsh);
        assert_eq!(
            shell_arg(&["datest", "completions", "powershell"]),
            Shell::PowerShell
        );
        assert!(Cli::try_parse_from(["datest", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_completions_follow_program_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("natest.fish");
        let mut cli = Cli::try_parse_from(["natest", "-q"]).unwrap();
        cli.program = Program::Natest;

        CompletionsCommand {
            shell: Shell::Fish,
            output: Some(path.clone()),
        }
        .execute(&cli)
        .unwrap();

        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.contains("complete -c natest"));
        assert!(script.contains("discover-only"));
    }
}
