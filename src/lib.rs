//! labelcheck - validates vendor container labels in Dockerfiles
//!
//! Descriptors come from local files, URLs or registry searches; their
//! `LABEL`s are checked against a fixed annotation table.

pub mod acquire;
pub mod cli;
pub mod descriptor;
pub mod observability;
pub mod schema;
