//! Descriptor acquisition
//!
//! Three sources hand raw descriptor text to the parse step:
//! - local files, optionally found by walking a directory tree
//! - remote URLs, one GET each
//! - registry search results with automated builds
//!
//! Failures are per subject and never stop a batch.

mod errors;
mod local;
mod registry;
mod remote;
mod staging;

pub use errors::{AcquireError, AcquireResult};
pub use local::{find_descriptors, read_descriptor};
pub use registry::{select_candidates, ImageSummary, SearchMismatchPolicy, SearchPage};
pub use remote::{DescriptorFetcher, HubClient, ImageRegistry, DEFAULT_REGISTRY_URL};
pub use staging::ScratchDir;
