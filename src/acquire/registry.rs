//! Registry search results and candidate selection

use serde::{Deserialize, Deserializer, Serialize};

use crate::observability::{Event, Logger};

/// One repository returned by a registry search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageSummary {
    #[serde(rename = "repo_name", alias = "name")]
    pub name: String,
    #[serde(default, alias = "description", deserialize_with = "null_as_empty")]
    pub short_description: String,
    #[serde(default)]
    pub pull_count: u64,
    #[serde(default)]
    pub star_count: u64,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default)]
    pub is_automated: bool,
}

impl ImageSummary {
    /// Repository path used by the registry API; official images live under `library/`.
    pub fn repository_path(&self) -> String {
        if self.name.contains('/') {
            self.name.clone()
        } else {
            format!("library/{}", self.name)
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of `GET /v2/search/repositories/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<ImageSummary>,
}

/// Body of `GET /v2/repositories/<name>/dockerfile/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerfileContents {
    pub contents: String,
}

/// What to do with search results whose name does not start with the pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMismatchPolicy {
    /// Drop them silently
    #[default]
    Drop,
    /// Drop them with a WARN log line each
    Warn,
}

/// Keeps results named with the exact `pattern` prefix that have automated builds.
///
/// Results without automated builds publish no descriptor, so they are
/// dropped before any fetch is attempted.
pub fn select_candidates(
    pattern: &str,
    results: Vec<ImageSummary>,
    policy: SearchMismatchPolicy,
) -> Vec<ImageSummary> {
    results
        .into_iter()
        .filter(|image| {
            if !image.name.starts_with(pattern) {
                if policy == SearchMismatchPolicy::Warn {
                    Logger::warn(
                        Event::SearchResultDropped.as_str(),
                        &[
                            ("image", image.name.as_str()),
                            ("pattern", pattern),
                            ("reason", "name does not start with pattern"),
                        ],
                    );
                }
                return false;
            }
            if !image.is_automated {
                Logger::trace(
                    Event::SearchResultDropped.as_str(),
                    &[("image", image.name.as_str()), ("reason", "no automated build")],
                );
                return false;
            }
            true
        })
        .collect()
}
