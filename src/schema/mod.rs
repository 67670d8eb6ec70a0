//! Annotation schema subsystem
//!
//! The schema is a fixed table of vendor labels, each bound to exactly one
//! rule kind. It is loaded once at startup and shared read-only.
//!
//! # Design Principles
//!
//! - The table is declarative data, not branching code
//! - Rule kinds form a closed enum; adding one is a compile-checked change
//! - Validation is a pure, total scan returning every violation

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationError};
pub use loader::SchemaLoader;
pub use types::{AnnotationRule, AnnotationSchema, RuleKind, NETWORK_MODES};
pub use validator::{AnnotationValidator, EmptyDescriptorPolicy, Validation, ValidatorOptions};
