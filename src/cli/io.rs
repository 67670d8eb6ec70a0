//! Human-readable report output
//!
//! - Files and URLs are reported one subject at a time, as checked
//! - Searches print every error group first, then the image listing
//! - Both sections of a search report are sorted by subject name
//! - A search request that failed outright is an error group of its own

use std::io::Write;

use crate::acquire::ImageSummary;
use crate::schema::Validation;

use super::errors::CliResult;

/// Result of checking one subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Labels were parsed and validated
    Checked(Validation),
    /// The descriptor could not be acquired or parsed
    Failed(String),
}

/// Outcome for one file, URL or image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectReport {
    pub subject: String,
    pub outcome: Outcome,
}

impl SubjectReport {
    pub fn error_count(&self) -> usize {
        match &self.outcome {
            Outcome::Checked(validation) => validation.errors.len(),
            Outcome::Failed(_) => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    /// Whether the subject has something to show besides "ok"
    pub fn has_findings(&self) -> bool {
        self.is_failed() || self.error_count() > 0
    }
}

/// A selected search result together with its check outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub image: ImageSummary,
    pub report: SubjectReport,
}

/// Writes one subject's outcome. Clean subjects are omitted when `quiet`.
pub fn write_subject<W: Write>(out: &mut W, report: &SubjectReport, quiet: bool) -> CliResult<()> {
    match &report.outcome {
        Outcome::Failed(reason) => {
            writeln!(out, "{}: failed: {}", report.subject, reason)?;
        }
        Outcome::Checked(validation) if validation.errors.is_empty() => {
            if !quiet {
                writeln!(out, "{}: ok", report.subject)?;
            }
        }
        Outcome::Checked(validation) => {
            writeln!(out, "{}: {} error(s)", report.subject, validation.errors.len())?;
            for error in &validation.errors {
                writeln!(out, "    {}", error.message)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Writes a search report: error groups first, then the image listing.
pub fn write_search_report<W: Write>(
    out: &mut W,
    failed_searches: &[SubjectReport],
    entries: &[SearchEntry],
) -> CliResult<()> {
    let mut sorted: Vec<&SearchEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.report.subject.cmp(&b.report.subject));

    let mut groups: Vec<&SubjectReport> = failed_searches
        .iter()
        .chain(sorted.iter().map(|e| &e.report))
        .filter(|report| report.has_findings())
        .collect();
    groups.sort_by(|a, b| a.subject.cmp(&b.subject));

    writeln!(out, "Errors:")?;
    if groups.is_empty() {
        writeln!(out, "    none")?;
    }
    for report in groups {
        write_subject(out, report, true)?;
    }

    writeln!(out)?;
    writeln!(out, "Images:")?;
    writeln!(
        out,
        "{:<40} {:>6} {:>12} {:<8} {:<9} {:>6}  DESCRIPTION",
        "NAME", "STARS", "PULLS", "OFFICIAL", "AUTOMATED", "ERRORS"
    )?;
    for entry in sorted {
        let image = &entry.image;
        let errors = if entry.report.is_failed() {
            "failed".to_string()
        } else {
            entry.report.error_count().to_string()
        };
        writeln!(
            out,
            "{:<40} {:>6} {:>12} {:<8} {:<9} {:>6}  {}",
            image.name,
            image.star_count,
            image.pull_count,
            yes_no(image.is_official),
            yes_no(image.is_automated),
            errors,
            image.short_description.trim()
        )?;
    }
    out.flush()?;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
