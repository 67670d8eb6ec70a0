//! labelcheck CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Runs the CLI (via cli::run)
//! 2. Prints process-level errors to stderr
//! 3. Exits with non-zero on interruption or setup failure
//!
//! Validation errors are part of the report and do not change the exit status.

use labelcheck::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
