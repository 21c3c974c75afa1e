//! verify-install CLI entry point
//!
//! Run from the root of an Enterprise live USB (or pass `--root`) to check
//! that the Mac can boot from it.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use verify_install::cli::args::{Args, Command, OutputFormat};
use verify_install::cli::output::{format_check_list, get_formatter};
use verify_install::version::get_build_info;
use verify_install::{run_validation, VerifyConfig};

use std::process::ExitCode;

/// Exit code for usage and runtime errors
const EXIT_RUNTIME_ERROR: u8 = 3;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_RUNTIME_ERROR)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.verbose);

    match args.selected_command() {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => {
            print!("{}", format_check_list());
            ExitCode::SUCCESS
        }
        Command::Check => run_checks(&args),
    }
}

/// Logs go to stderr; stdout carries the report.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn run_checks(args: &Args) -> ExitCode {
    let config = VerifyConfig::from_args(args);

    let formatter = match get_formatter(args.format, args.color(), args.verbose) {
        Ok(formatter) => formatter,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let stream_diagnostics = args.format == OutputFormat::Text;
    let report = run_validation(&config, |diagnostic| {
        if stream_diagnostics {
            println!("{}", diagnostic);
        }
    });

    match formatter.format(&report) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    }

    ExitCode::from(report.result.exit_code())
}
