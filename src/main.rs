//! pii-core-cli entry point.
//!
//! Detects, masks and decrypts PII in local files. Logs go to stderr;
//! results go to stdout.

mod cli_parser;
mod commands;

use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(|s| s.as_str()) else {
        cli_parser::print_usage();
        return ExitCode::from(commands::EXIT_USAGE as u8);
    };

    let code = match command {
        "detect" => commands::run_detect(&args),
        "mask" => commands::run_mask(&args),
        "decrypt" => commands::run_decrypt(&args),
        "batch" => commands::run_batch(&args),
        "help" | "--help" | "-h" => {
            if let Some(sub) = args.get(2) {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            commands::EXIT_OK
        }
        "version" | "--version" | "-V" => {
            println!("pii-core {}", env!("CARGO_PKG_VERSION"));
            commands::EXIT_OK
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            commands::EXIT_USAGE
        }
    };
    ExitCode::from(code as u8)
}
