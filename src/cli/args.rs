//! CLI argument definitions using clap
//!
//! labelcheck [-v|-q] [--config <path>]
//!     [--dockerfile <path>...] [--dockerurl <url>...] [--search <pattern>...]

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::observability::Severity;

use super::commands::CheckRequest;

/// Validates vendor labels in Dockerfiles
#[derive(Parser, Debug)]
#[command(name = "labelcheck")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .multiple(true)
        .args(["dockerfiles", "dockerurls", "searches"])
))]
pub struct Cli {
    /// Log per-label detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors and omit clean subjects from the report
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dockerfiles to check; directories are searched recursively
    #[arg(long = "dockerfile", value_name = "PATH", num_args = 1..)]
    pub dockerfiles: Vec<PathBuf>,

    /// URLs of Dockerfiles to check
    #[arg(long = "dockerurl", value_name = "URL", num_args = 1..)]
    pub dockerurls: Vec<String>,

    /// Registry search patterns; matching automated builds are checked
    #[arg(long = "search", value_name = "PATTERN", num_args = 1..)]
    pub searches: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Lowest log severity written for the chosen verbosity
    pub fn log_threshold(&self) -> Severity {
        if self.verbose {
            Severity::Trace
        } else if self.quiet {
            Severity::Error
        } else {
            Severity::Info
        }
    }

    /// The subjects to check, grouped by source
    pub fn request(&self) -> CheckRequest {
        CheckRequest {
            dockerfiles: self.dockerfiles.clone(),
            dockerurls: self.dockerurls.clone(),
            searches: self.searches.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_accept_multiple_values_and_repeat() {
        let cli = Cli::try_parse_from([
            "labelcheck",
            "--dockerfile",
            "a/Dockerfile",
            "b/Dockerfile",
            "--search",
            "acme/",
            "--dockerfile",
            "c",
            "--dockerurl",
            "https://example.com/Dockerfile",
        ])
        .unwrap();

        assert_eq!(cli.dockerfiles.len(), 3);
        assert_eq!(cli.searches, vec!["acme/".to_string()]);
        assert_eq!(cli.dockerurls.len(), 1);
        assert_eq!(cli.log_threshold(), Severity::Info);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["labelcheck", "-v", "-q", "--search", "acme/"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_threshold() {
        let cli = Cli::try_parse_from(["labelcheck", "--verbose", "--search", "acme/"]).unwrap();
        assert_eq!(cli.log_threshold(), Severity::Trace);

        let cli = Cli::try_parse_from(["labelcheck", "--quiet", "--search", "acme/"]).unwrap();
        assert_eq!(cli.log_threshold(), Severity::Error);
    }

    #[test]
    fn test_an_input_is_required() {
        assert!(Cli::try_parse_from(["labelcheck", "--verbose"]).is_err());
    }
}
