//! Command-line layer: argument parsing, logging setup, command dispatch
//! and cargo-style reporting. The core never prints; everything
//! user-facing happens here.

use anyhow::Result;

pub mod args;
mod commands;
mod exit_status;
mod logging;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();
    let level = args.log.log_level.unwrap_or(if verbose {
        args::LogLevel::Info
    } else {
        args::LogLevel::Error
    });
    logging::init_logging(level, args.log.log_format);

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
