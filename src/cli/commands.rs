//! Batch driver
//!
//! Checks every subject named on the command line, strictly one at a time:
//! 1. Local files (directories are walked)
//! 2. URLs
//! 3. Registry searches, reported after all results are checked
//!
//! Per-subject failures are reported and the batch continues. Only an
//! interruption or a setup failure ends the process with an error.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::acquire::{
    find_descriptors, read_descriptor, select_candidates, AcquireResult, DescriptorFetcher,
    HubClient, ImageRegistry, ImageSummary, ScratchDir, SearchMismatchPolicy,
    DEFAULT_REGISTRY_URL,
};
use crate::descriptor::parse_labels;
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope};
use crate::schema::{
    AnnotationSchema, AnnotationValidator, EmptyDescriptorPolicy, SchemaLoader, ValidatorOptions,
};

use super::errors::{CliError, CliResult};
use super::io::{write_search_report, write_subject, Outcome, SearchEntry, SubjectReport};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Registry API endpoint used by searches
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// File name that marks a descriptor when walking directories
    #[serde(default = "default_descriptor_filename")]
    pub descriptor_filename: String,

    /// Replacement annotation table (optional, built-in table otherwise)
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Whether a descriptor without vendor labels is an error
    #[serde(default)]
    pub empty_descriptor: EmptyDescriptorPolicy,

    /// Whether dropped non-matching search results are logged
    #[serde(default)]
    pub search_mismatch: SearchMismatchPolicy,

    /// Max search result pages followed per pattern
    #[serde(default = "default_search_page_limit")]
    pub search_page_limit: usize,

    /// Parent of the per-run scratch directory (system temp dir otherwise)
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}
fn default_descriptor_filename() -> String {
    "Dockerfile".to_string()
}
fn default_search_page_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            descriptor_filename: default_descriptor_filename(),
            schema_path: None,
            empty_descriptor: EmptyDescriptorPolicy::default(),
            search_mismatch: SearchMismatchPolicy::default(),
            search_page_limit: default_search_page_limit(),
            scratch_root: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if !self.registry_url.starts_with("http://") && !self.registry_url.starts_with("https://") {
            return Err(CliError::config_error(format!(
                "Invalid registry_url: '{}'. Must be an http(s) URL.",
                self.registry_url
            )));
        }

        if self.descriptor_filename.is_empty() || self.descriptor_filename.contains('/') {
            return Err(CliError::config_error(format!(
                "Invalid descriptor_filename: '{}'. Must be a bare file name.",
                self.descriptor_filename
            )));
        }

        if self.search_page_limit == 0 {
            return Err(CliError::config_error("search_page_limit must be > 0"));
        }

        Ok(())
    }

    fn scratch_dir(&self) -> AcquireResult<ScratchDir> {
        match &self.scratch_root {
            Some(root) => ScratchDir::new_in(root),
            None => ScratchDir::new(),
        }
    }

    fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            empty_descriptor: self.empty_descriptor,
        }
    }
}

/// Subjects to check, grouped by source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    pub dockerfiles: Vec<PathBuf>,
    pub dockerurls: Vec<String>,
    pub searches: Vec<String>,
}

impl CheckRequest {
    fn needs_scratch(&self) -> bool {
        !self.dockerurls.is_empty() || !self.searches.is_empty()
    }
}

/// Read-only state shared by every subject of a run
pub struct RunContext<'a> {
    pub schema: &'a AnnotationSchema,
    pub config: &'a Config,
    /// Omit clean subjects from the report
    pub quiet: bool,
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Subjects whose labels were validated
    pub checked: usize,
    /// Subjects that could not be acquired or parsed
    pub failed: usize,
    /// Validation errors across all subjects
    pub errors: usize,
    /// Scratch directory used by the run, already removed
    pub scratch: Option<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, report: &SubjectReport) {
        match &report.outcome {
            Outcome::Checked(validation) => {
                self.checked += 1;
                self.errors += validation.errors.len();
            }
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments, loads configuration and the annotation table, then
/// runs the batch on a single-threaded runtime until it finishes or the
/// user interrupts it.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    Logger::set_threshold(cli.log_threshold());

    let config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        let path = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
    }

    let schema = SchemaLoader::load(config.schema_path.as_deref())?;
    let label_count = schema.labels.len().to_string();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("labels", label_count.as_str()), ("namespace", schema.namespace.as_str())],
    );

    let ctx = RunContext {
        schema: &schema,
        config: &config,
        quiet: cli.quiet,
    };
    let client = HubClient::new(config.registry_url.as_str(), config.search_page_limit);
    let request = cli.request();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let mut stdout = io::stdout().lock();
        tokio::select! {
            result = run_checks(&ctx, &client, &request, &mut stdout) => result.map(|_| ()),
            // Dropping the run future releases the scratch directory.
            Ok(()) = tokio::signal::ctrl_c() => {
                Logger::warn(Event::Interrupted.as_str(), &[]);
                Err(CliError::interrupted())
            }
        }
    })
}

/// Checks every subject of `request`, writing the report to `out`.
pub async fn run_checks<C, W>(
    ctx: &RunContext<'_>,
    client: &C,
    request: &CheckRequest,
    out: &mut W,
) -> CliResult<RunSummary>
where
    C: DescriptorFetcher + ImageRegistry,
    W: Write,
{
    let scope = ObservationScope::new("CHECK");
    let mut summary = RunSummary::default();
    let mut scratch = if request.needs_scratch() {
        Some(ctx.config.scratch_dir()?)
    } else {
        None
    };

    for path in &request.dockerfiles {
        check_files(ctx, path, &mut summary, out).await?;
    }

    if let Some(scratch) = scratch.as_mut() {
        for url in &request.dockerurls {
            let fetched = client.fetch_url(url).await;
            let text = fetched.and_then(|text| stage(scratch, ctx, &text));
            let report = check_text(ctx, url, text);
            summary.record(&report);
            write_subject(out, &report, ctx.quiet)?;
            tokio::task::yield_now().await;
        }

        if !request.searches.is_empty() {
            let (failed_searches, entries) =
                check_searches(ctx, client, &request.searches, scratch).await;
            for report in failed_searches.iter().chain(entries.iter().map(|e| &e.report)) {
                summary.record(report);
            }
            write_search_report(out, &failed_searches, &entries)?;
        }
    }

    if let Some(scratch) = scratch.take() {
        summary.scratch = Some(scratch.path().to_path_buf());
        scratch.close()?;
    }

    let checked = summary.checked.to_string();
    let failed = summary.failed.to_string();
    let errors = summary.errors.to_string();
    scope.complete_with_fields(&[
        ("checked", checked.as_str()),
        ("errors", errors.as_str()),
        ("failed", failed.as_str()),
    ]);

    Ok(summary)
}

/// Local reads never suspend, so each subject yields to let an interrupt in.
async fn check_files<W: Write>(
    ctx: &RunContext<'_>,
    path: &Path,
    summary: &mut RunSummary,
    out: &mut W,
) -> CliResult<()> {
    for descriptor in find_descriptors(path, &ctx.config.descriptor_filename) {
        let subject = descriptor.display().to_string();
        let report = check_text(ctx, &subject, read_descriptor(&descriptor));
        summary.record(&report);
        write_subject(out, &report, ctx.quiet)?;
        tokio::task::yield_now().await;
    }
    Ok(())
}

/// Searches every pattern, fetches all selected descriptors, then validates them.
///
/// Returns the failed searches alongside the checked images.
async fn check_searches<C>(
    ctx: &RunContext<'_>,
    client: &C,
    patterns: &[String],
    scratch: &mut ScratchDir,
) -> (Vec<SubjectReport>, Vec<SearchEntry>)
where
    C: ImageRegistry,
{
    let mut failed_searches = Vec::new();
    // Keyed by name so overlapping patterns check an image once.
    let mut selected: BTreeMap<String, ImageSummary> = BTreeMap::new();

    for pattern in patterns {
        let scope = ObservationScope::with_fields("SEARCH", &[("pattern", pattern.as_str())]);
        match client.search(pattern).await {
            Ok(results) => {
                let total = results.len().to_string();
                let kept = select_candidates(pattern, results, ctx.config.search_mismatch);
                let kept_count = kept.len().to_string();
                Logger::info(
                    Event::SearchResults.as_str(),
                    &[
                        ("kept", kept_count.as_str()),
                        ("pattern", pattern.as_str()),
                        ("total", total.as_str()),
                    ],
                );
                for image in kept {
                    selected.entry(image.name.clone()).or_insert(image);
                }
                scope.complete();
            }
            Err(e) => {
                let reason = e.to_string();
                scope.fail(&reason);
                failed_searches.push(SubjectReport {
                    subject: format!("search '{}'", pattern),
                    outcome: Outcome::Failed(reason),
                });
            }
        }
    }

    let mut fetched = Vec::with_capacity(selected.len());
    for image in selected.into_values() {
        let text = client
            .fetch_descriptor(&image)
            .await
            .and_then(|text| stage(scratch, ctx, &text));
        fetched.push((image, text));
    }

    let mut entries = Vec::with_capacity(fetched.len());
    for (image, text) in fetched {
        let report = check_text(ctx, &image.name, text);
        entries.push(SearchEntry { image, report });
        tokio::task::yield_now().await;
    }

    (failed_searches, entries)
}

fn stage(scratch: &mut ScratchDir, ctx: &RunContext<'_>, text: &str) -> AcquireResult<String> {
    scratch.round_trip(&ctx.config.descriptor_filename, text)
}

/// Parses and validates one acquired descriptor.
fn check_text(ctx: &RunContext<'_>, subject: &str, text: AcquireResult<String>) -> SubjectReport {
    let outcome = match text {
        Err(e) => {
            let reason = e.to_string();
            Logger::error(
                Event::AcquireFailed.as_str(),
                &[("kind", e.kind()), ("reason", reason.as_str()), ("subject", subject)],
            );
            Outcome::Failed(reason)
        }
        Ok(text) => match parse_labels(&text) {
            Err(e) => {
                let reason = e.to_string();
                Logger::error(
                    Event::ParseFailed.as_str(),
                    &[("reason", reason.as_str()), ("subject", subject)],
                );
                Outcome::Failed(reason)
            }
            Ok(labels) => {
                let validation =
                    AnnotationValidator::with_options(ctx.schema, ctx.config.validator_options())
                        .validate(subject, &labels);

                for key in &validation.ignored {
                    Logger::trace(
                        Event::LabelIgnored.as_str(),
                        &[("label", key.as_str()), ("subject", subject)],
                    );
                }
                let errors = validation.errors.len().to_string();
                Logger::info(
                    Event::SubjectChecked.as_str(),
                    &[("errors", errors.as_str()), ("subject", subject)],
                );
                Outcome::Checked(validation)
            }
        },
    };

    SubjectReport {
        subject: subject.to_string(),
        outcome,
    }
}
