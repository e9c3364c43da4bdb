use std::process::ExitCode;

use colored::Colorize;
use expr_gen::cli::{CommandLineInterface, Status};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // logs go to stderr; stdout is reserved for `model` output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("expr_gen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command_line_interface = CommandLineInterface::load();
    match command_line_interface.run() {
        Ok(Status::Done) => ExitCode::SUCCESS,
        Ok(Status::OutOfDate) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
