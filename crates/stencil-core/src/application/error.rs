//! Application layer errors.
//!
//! These errors represent failures while generating files, not configuration
//! rule violations. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, StencilError};

/// Errors that occur during generation.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The scaffold configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// The scaffold configuration file could not be read or parsed.
    #[error("Failed to load configuration {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    /// A URL or local template could not be fetched or read.
    #[error("Source unavailable for '{file}' ({source_ref}): {reason}")]
    SourceUnavailable {
        file: String,
        source_ref: String,
        reason: String,
    },

    /// Inline content is not a valid template.
    #[error("Template rendering failed for '{file}': {reason}")]
    RenderFailure { file: String, reason: String },

    /// A stale output directory could not be removed.
    #[error("Failed to clear output directory {path}: {reason}")]
    DirectoryResetFailure { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A referenced group vanished between validation and generation.
    #[error("template group '{group}' not found in configuration")]
    GroupNotFound { group: String },

    /// A repository's processing stopped at its first failing file.
    #[error("repository '{repository}' failed: {source}")]
    RepositoryFailed {
        repository: String,
        source: Box<StencilError>,
    },

    /// Shared adapter state was poisoned by a panicking thread.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigNotFound { path } => vec![
                format!("No file at {}", path.display()),
                "Pass the scaffold configuration with --config <FILE>".into(),
            ],
            Self::ConfigLoad { .. } => vec![
                "Check the file for syntax errors".into(),
                "Allowed keys: templateGroups, repositories, name, files, groups, filename, sourceFile, sourceUrl, content, values, groupName".into(),
            ],
            Self::SourceUnavailable { source_ref, .. } => vec![
                format!("Check that {} is reachable", source_ref),
            ],
            Self::RenderFailure { .. } => vec![
                "Inline content must be a valid template, e.g. {{ .Name }}".into(),
                "Check that every referenced value is provided".into(),
            ],
            Self::DirectoryResetFailure { path, .. } | Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::RepositoryFailed { source, .. } => source.suggestions(),
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigLoad { .. } => ErrorCategory::Configuration,
            Self::GroupNotFound { .. } => ErrorCategory::Configuration,
            Self::RepositoryFailed { source, .. } => source.category(),
            Self::SourceUnavailable { .. }
            | Self::RenderFailure { .. }
            | Self::DirectoryResetFailure { .. }
            | Self::FilesystemError { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}

/// Why a template could not be rendered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct RenderError {
    pub reason: String,
}

impl RenderError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
