//! CLI module for labelcheck
//!
//! Provides the command-line surface:
//! - --dockerfile: check local files and directory trees
//! - --dockerurl: check descriptors fetched from URLs
//! - --search: check automated builds found by a registry search

mod args;
mod commands;
mod errors;
mod io;

pub use args::Cli;
pub use commands::{run, run_checks, CheckRequest, Config, RunContext, RunSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_search_report, write_subject, Outcome, SearchEntry, SubjectReport};
