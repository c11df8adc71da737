//! Shared types for the document-index client: the mapping schema model and
//! the dotted-path document accessor.

pub mod document;
pub mod mapping;

pub use document::{Resolution, resolve_path};
pub use mapping::{FieldPath, MappingNode};
