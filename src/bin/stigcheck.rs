//! stigcheck CLI binary.

use std::process::ExitCode;

use clap::Parser;
use stigcheck::cli::{codes, execute_audit, execute_diff, execute_interfaces, Cli, Command};
use stigcheck::logger::init_env_logger;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_env_logger(&cli.log_level);

    let result = match &cli.command {
        Command::Audit(args) => execute_audit(args),
        Command::Diff(args) => execute_diff(args),
        Command::Interfaces(args) => execute_interfaces(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(codes::ERROR)
        }
    }
}
