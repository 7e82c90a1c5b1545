//! Core domain layer for Stencil.
//!
//! This module contains pure logic with no I/O. Reading files, fetching URLs
//! and rendering templates are handled via ports (traits) defined in the
//! application layer.
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable configuration**: loaded once, then only read
//! - **Transient copies**: merged values are attached to copies of a
//!   [`FileSpec`], never to the stored originals

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    common::RelativePath,
    configuration::{Configuration, GroupReference, RepositoryConfig, TemplateGroup, TemplateGroups},
    file_spec::{FileSource, FileSpec},
};

pub use error::{DomainError, ErrorCategory, NameKind};

pub use value_objects::{Parallelism, Values, merge_values};

pub use validation::DomainValidator;
