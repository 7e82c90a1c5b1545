//! File Materializer - turns one `FileSpec` into one file on disk.
//!
//! Source precedence is inline content, then URL, then local file.
//! Inline content must render. Fetched and local sources are attempted as
//! templates and written verbatim when they do not render, so binary assets
//! and files with foreign `{{ }}` syntax pass through untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, SourceFetcher, TemplateRenderer},
    },
    domain::{FileSource, FileSpec},
    error::{StencilError, StencilResult},
};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// Written from a successfully rendered template.
    Rendered(PathBuf),
    /// Written byte-for-byte because the source did not render.
    Copied(PathBuf),
    /// Nothing was written: the spec declares no source.
    Skipped,
}

/// Produces single files from file specs.
///
/// Shared by every worker of a dispatch, so ports are held behind `Arc`.
pub struct FileMaterializer {
    fetcher: Arc<dyn SourceFetcher>,
    renderer: Arc<dyn TemplateRenderer>,
    filesystem: Arc<dyn Filesystem>,
}

impl FileMaterializer {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        renderer: Arc<dyn TemplateRenderer>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            filesystem,
        }
    }

    /// Write `spec` under `destination_root`.
    ///
    /// Parent directories are created as needed and an existing file at the
    /// destination is overwritten.
    #[instrument(
        skip_all,
        fields(repository = %repository, file = %spec.filename)
    )]
    pub fn materialize(
        &self,
        destination_root: &Path,
        repository: &str,
        spec: &FileSpec,
    ) -> StencilResult<Materialized> {
        let Some(source) = spec.source() else {
            debug!("No source declared, skipping");
            return Ok(Materialized::Skipped);
        };

        let destination = destination_root.join(spec.filename.as_path());
        let file = spec.filename.to_string();

        let (bytes, outcome) = match source {
            FileSource::Inline(text) => {
                let rendered = self
                    .renderer
                    .render(&file, text, &spec.values)
                    .map_err(|e| ApplicationError::RenderFailure {
                        file: file.clone(),
                        reason: e.to_string(),
                    })?;
                (rendered.into_bytes(), Materialized::Rendered(destination.clone()))
            }
            FileSource::Remote(url) => {
                let raw = self
                    .fetcher
                    .fetch(url)
                    .map_err(|e| unavailable(&file, url, e))?;
                self.render_or_copy(&file, raw, spec, &destination)
            }
            FileSource::Local(path) => {
                let raw = self
                    .filesystem
                    .read_file(path)
                    .map_err(|e| unavailable(&file, &path.display().to_string(), e))?;
                self.render_or_copy(&file, raw, spec, &destination)
            }
        };

        if let Some(parent) = destination.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&destination, &bytes)?;

        debug!(source = source.key(), path = %destination.display(), "File written");
        Ok(outcome)
    }

    fn render_or_copy(
        &self,
        file: &str,
        raw: Vec<u8>,
        spec: &FileSpec,
        destination: &Path,
    ) -> (Vec<u8>, Materialized) {
        let text = match std::str::from_utf8(&raw) {
            Ok(text) => text,
            Err(_) => {
                debug!("Source is not UTF-8, copying verbatim");
                return (raw, Materialized::Copied(destination.to_path_buf()));
            }
        };

        match self.renderer.render(file, text, &spec.values) {
            Ok(rendered) => (
                rendered.into_bytes(),
                Materialized::Rendered(destination.to_path_buf()),
            ),
            Err(e) => {
                debug!(reason = %e, "Source does not render, copying verbatim");
                (raw, Materialized::Copied(destination.to_path_buf()))
            }
        }
    }
}

/// Attach the destination file to a fetch or read failure.
fn unavailable(file: &str, source_ref: &str, error: StencilError) -> StencilError {
    let reason = match error {
        StencilError::Application(ApplicationError::SourceUnavailable { reason, .. }) => reason,
        other => other.to_string(),
    };
    ApplicationError::SourceUnavailable {
        file: file.into(),
        source_ref: source_ref.into(),
        reason,
    }
    .into()
}
