//! Descriptor (Dockerfile) decoding
//!
//! Turns raw descriptor text into a `LabelSet`. The Dockerfile grammar itself
//! is handled by `dockerfile-parser`; this module only collects labels.

mod labels;
mod parser;

pub use labels::LabelSet;
pub use parser::{parse_labels, DescriptorError, DescriptorResult};
