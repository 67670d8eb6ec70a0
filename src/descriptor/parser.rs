//! Extracts `LABEL` assignments from Dockerfile text

use dockerfile_parser::{Dockerfile, Instruction};
use thiserror::Error;

use super::labels::LabelSet;

/// Descriptor text that could not be decoded into labels
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    #[error("Descriptor syntax error: {0}")]
    Syntax(String),
}

/// Result type for descriptor parsing
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Parses descriptor text and collects the labels of every `LABEL` instruction.
///
/// Labels from all build stages are merged; a later assignment of the same
/// key replaces the earlier one.
pub fn parse_labels(text: &str) -> DescriptorResult<LabelSet> {
    let dockerfile =
        Dockerfile::parse(text).map_err(|e| DescriptorError::Syntax(e.to_string()))?;

    let labels = dockerfile
        .instructions
        .into_iter()
        .filter_map(|instruction| match instruction {
            Instruction::Label(label) => Some(label.labels),
            _ => None,
        })
        .flatten()
        .map(|label| (label.name.content, label.value.content));

    Ok(labels.collect())
}
