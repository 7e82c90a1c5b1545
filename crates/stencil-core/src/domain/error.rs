// ============================================================================
// domain/error.rs - CONFIGURATION RULE VIOLATIONS
// ============================================================================

use std::fmt;

use thiserror::Error;

/// Which namespace a duplicated name was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Repository,
    TemplateGroup,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository => write!(f, "repository"),
            Self::TemplateGroup => write!(f, "template group"),
        }
    }
}

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports are shared across worker threads)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Every variant names the offending entity so a single diagnostic is enough
/// to locate the problem in the configuration file.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("duplicate {kind} name: '{name}'")]
    DuplicateName { kind: NameKind, name: String },

    #[error("{owner}: file '{file}' declares more than one source ({sources})")]
    ConflictingSource {
        owner: String,
        file: String,
        sources: String,
    },

    #[error("{owner}: file '{file}' declares no source (sourceFile, sourceUrl or content)")]
    EmptySource { owner: String, file: String },

    #[error("{owner}: template file for '{file}' not found: {path}")]
    MissingSourceFile {
        owner: String,
        file: String,
        path: String,
    },

    #[error("repository '{repository}' refers to non-existent group: '{group}'")]
    UnknownGroup { repository: String, group: String },

    #[error("{owner}: invalid sourceUrl '{url}' for file '{file}': {reason}")]
    InvalidUrl {
        owner: String,
        file: String,
        url: String,
        reason: String,
    },

    #[error("invalid repository name '{name}': {reason}")]
    InvalidRepositoryName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the repository output directory: {path}")]
    PathEscapesRoot { path: String },

    #[error("File name must not be empty")]
    EmptyPath,

    #[error("invalid max-parallel value: {value}. It must be greater than 0")]
    InvalidParallelism { value: usize },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("no repository named '{name}' in configuration")]
    UnknownRepository { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DuplicateName { kind, name } => vec![
                format!("Rename one of the {}s called '{}'", kind, name),
                "Names must be unique within a configuration file".into(),
            ],
            Self::ConflictingSource { .. } => vec![
                "Keep exactly one of sourceFile, sourceUrl or content per file".into(),
            ],
            Self::EmptySource { .. } => vec![
                "Add one of sourceFile, sourceUrl or content to the file entry".into(),
            ],
            Self::MissingSourceFile { path, .. } => vec![
                format!("Create the template file: {}", path),
                "Or point --templates at the directory that holds it".into(),
            ],
            Self::UnknownGroup { group, .. } => vec![
                format!("Declare '{}' under templateGroups", group),
                "Check the groupName for typos".into(),
            ],
            Self::InvalidUrl { .. } => vec![
                "Use an absolute http:// or https:// URL".into(),
            ],
            Self::InvalidRepositoryName { .. } => vec![
                "A repository name becomes one directory under the output root".into(),
                "Use a plain name such as 'svc-a', without '/', '.' or '..'".into(),
            ],
            Self::InvalidParallelism { .. } => vec![
                "Pass a positive number, e.g. --max-parallel 5".into(),
            ],
            Self::UnknownRepository { name } => vec![
                format!("'{}' is not declared under repositories", name),
                "Try: stencil list --config <FILE>".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownRepository { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
}
