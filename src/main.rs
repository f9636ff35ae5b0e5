//! Warhorse - command-line task runner for web projects

use std::process::ExitCode;

use warhorse::cli;

fn main() -> ExitCode {
    cli::run()
}
