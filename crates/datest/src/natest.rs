//! Natest - the datest runner under its legacy name
//!
//! Uses built-in defaults unless `--config` is given.

mod cli;
mod exit_codes;

use cli::Program;

fn main() {
    std::process::exit(cli::run(Program::Natest));
}
