//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.
//!
//! Every port is `Send + Sync`: one adapter instance is shared by all
//! repository workers of a dispatch.

use std::path::Path;

use crate::application::error::RenderError;
use crate::application::services::RepositoryOutcome;
use crate::domain::Values;
use crate::error::StencilResult;

#[cfg(test)]
use mockall::automock;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write bytes to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> StencilResult<Vec<u8>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove whatever is at `path`: a directory with all its contents, or a
    /// single file. A missing path is not an error.
    fn remove_all(&self, path: &Path) -> StencilResult<()>;
}

/// Port for fetching remote file sources.
///
/// Implemented by:
/// - `stencil_adapters::fetcher::HttpFetcher` (production, blocking HTTP)
/// - `stencil_adapters::fetcher::MemoryFetcher` (testing)
///
/// A response status of 400 or above is an error, as is any transport
/// failure. Both surface as `ApplicationError::SourceUnavailable`.
#[cfg_attr(test, automock)]
pub trait SourceFetcher: Send + Sync {
    /// Fetch the body at `url`.
    fn fetch(&self, url: &str) -> StencilResult<Vec<u8>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `stencil_adapters::renderer::TextTemplateRenderer` (Go text/template via `gtmpl`)
pub trait TemplateRenderer: Send + Sync {
    /// Render `source` with `values` bound as the template's data.
    ///
    /// `name` identifies the template in diagnostics only.
    fn render(&self, name: &str, source: &str, values: &Values) -> Result<String, RenderError>;
}

/// Port for following a dispatch as it happens.
///
/// Both callbacks run on the worker thread that executes the repository, so
/// an implementation sees exactly the concurrency the dispatcher allows.
pub trait DispatchObserver: Send + Sync {
    /// A worker picked up `repository`.
    fn on_started(&self, _repository: &str) {}

    /// A worker finished a repository, successfully or not.
    fn on_finished(&self, _outcome: &RepositoryOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
