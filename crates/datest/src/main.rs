//! Datest - Test runner for Dana `.na` files

mod cli;
mod exit_codes;

use cli::Program;

fn main() {
    std::process::exit(cli::run(Program::Datest));
}
