use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod logging;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    if let Err(e) = logging::init(cli.debug, cli.log_file.as_deref()) {
        eprintln!("cephsum: {e:#}");
        return ExitCode::FAILURE;
    }
    match commands::run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("cephsum: {e:#}");
            ExitCode::FAILURE
        }
    }
}
