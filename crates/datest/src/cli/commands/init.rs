//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use datest_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};

use crate::cli::output;
use crate::cli::Cli;

/// Create a datest.toml configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        // Check if config already exists
        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!(
                "  1. Edit {} to set your interpreter command and test patterns",
                config_path.display()
            );
            println!(
                "  2. Run {} to check which files are picked up",
                style(format!("{} discover", cli.program.name())).cyan()
            );
            println!(
                "  3. Run {} to execute your tests",
                style(cli.program.name()).cyan()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use datest_core::config::{load_config, Config};
    use tempfile::TempDir;

    fn quiet_cli() -> Cli {
        Cli::try_parse_from(["datest", "-q"]).unwrap()
    }

    #[test]
    fn test_init_writes_default_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("datest.toml");

        let cmd = InitCommand {
            force: false,
            yes: true,
            output: Some(path.clone()),
        };
        cmd.execute(&quiet_cli()).unwrap();

        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("datest.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let cmd = InitCommand {
            force: false,
            yes: true,
            output: Some(path.clone()),
        };
        assert!(cmd.execute(&quiet_cli()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        let cmd = InitCommand {
            force: true,
            yes: true,
            output: Some(path.clone()),
        };
        cmd.execute(&quiet_cli()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_TEMPLATE);
    }
}
