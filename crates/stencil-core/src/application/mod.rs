//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (validation, materialization,
//!   repository processing, parallel dispatch)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ConfigValidator, DispatchReport, Dispatcher, FileMaterializer, Materialized,
    RepositoryOutcome, RepositoryProcessor, RepositorySummary,
};

pub use ports::{DispatchObserver, Filesystem, SourceFetcher, TemplateRenderer};

pub use error::{ApplicationError, RenderError};
