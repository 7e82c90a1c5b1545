pub mod common;
pub mod configuration;
pub mod file_spec;

pub use super::error::DomainError;
pub use configuration::{Configuration, GroupReference, RepositoryConfig, TemplateGroup, TemplateGroups};
pub use file_spec::{FileSource, FileSpec};
