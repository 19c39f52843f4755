//! `tach` binary entry point.

mod args;
mod commands;
mod report;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tach_core::errors::{ConfigError, ProjectError, ScanError};
use tach_core::TachErrorCode;

use args::Cli;
use report::EnvSnapshot;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tach_core::tracing::init_tracing(cli.verbose);
    let env = EnvSnapshot::from_process();

    match commands::dispatch(cli.command, &env) {
        Ok(code) => code,
        Err(err) => {
            if let Some(code) = error_code(&err) {
                tracing::debug!(code, "command failed");
            }
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = err.downcast_ref::<ProjectError>() {
        return Some(e.error_code());
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return Some(e.error_code());
    }
    err.downcast_ref::<ScanError>().map(TachErrorCode::error_code)
}
