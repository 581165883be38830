//! CLI commands

mod completions;
mod discover;
mod init;
mod run;
mod selection;

pub use completions::CompletionsCommand;
pub use discover::DiscoverCommand;
pub use init::InitCommand;
pub use run::{ReporterArg, RunCommand};
pub use selection::SelectionArgs;
