//! This crate implements the core data model for a content-addressable
//! versioning repository and the fetch step that merges a peer's payload
//! into it.

pub mod fetch;
pub mod object;
pub mod refs;
pub mod repo;
