//! Repository Processor - generates one repository's output directory.
//!
//! Workflow:
//! 1. Remove the previous output directory, if any
//! 2. Materialize the repository's own files
//! 3. Materialize each referenced group, with the reference's values
//!    overriding each file's defaults
//!
//! The first failing file stops the repository. Files already written stay
//! on disk.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::materializer::{FileMaterializer, Materialized},
    },
    domain::{FileSpec, RepositoryConfig, TemplateGroups, merge_values},
    error::{StencilError, StencilResult},
};

/// Counts of what a repository run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    pub repository: String,
    pub rendered: usize,
    pub copied: usize,
    pub skipped: usize,
}

impl RepositorySummary {
    fn new(repository: &str) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: &Materialized) {
        match outcome {
            Materialized::Rendered(_) => self.rendered += 1,
            Materialized::Copied(_) => self.copied += 1,
            Materialized::Skipped => self.skipped += 1,
        }
    }

    /// Files actually written.
    pub fn written(&self) -> usize {
        self.rendered + self.copied
    }
}

/// Processes a single repository.
pub struct RepositoryProcessor {
    materializer: FileMaterializer,
    filesystem: Arc<dyn Filesystem>,
}

impl RepositoryProcessor {
    pub fn new(materializer: FileMaterializer, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            materializer,
            filesystem,
        }
    }

    /// Regenerate `<output_root>/<repository.name>` from scratch.
    ///
    /// Every error is wrapped in `ApplicationError::RepositoryFailed`.
    #[instrument(skip_all, fields(repository = %repository.name))]
    pub fn process(
        &self,
        repository: &RepositoryConfig,
        groups: &TemplateGroups,
        output_root: &Path,
    ) -> StencilResult<RepositorySummary> {
        self.process_inner(repository, groups, output_root)
            .map_err(|e| {
                StencilError::from(ApplicationError::RepositoryFailed {
                    repository: repository.name.clone(),
                    source: Box::new(e),
                })
            })
    }

    fn process_inner(
        &self,
        repository: &RepositoryConfig,
        groups: &TemplateGroups,
        output_root: &Path,
    ) -> StencilResult<RepositorySummary> {
        let destination = output_root.join(repository.output_dir()?);
        self.reset_directory(&destination)?;

        let mut summary = RepositorySummary::new(&repository.name);

        for spec in &repository.files {
            let outcome = self
                .materializer
                .materialize(&destination, &repository.name, spec)?;
            summary.record(&outcome);
        }

        for reference in &repository.groups {
            let group = groups
                .get(&reference.group_name)
                .ok_or_else(|| ApplicationError::GroupNotFound {
                    group: reference.group_name.clone(),
                })?;
            debug!(group = %group.name, files = group.files.len(), "Applying group");

            for spec in &group.files {
                // The group's own spec is shared with every other repository.
                let effective = FileSpec {
                    values: merge_values(&reference.values, &spec.values),
                    ..spec.clone()
                };
                let outcome = self
                    .materializer
                    .materialize(&destination, &repository.name, &effective)?;
                summary.record(&outcome);
            }
        }

        info!(
            rendered = summary.rendered,
            copied = summary.copied,
            skipped = summary.skipped,
            "Repository generated"
        );
        Ok(summary)
    }

    fn reset_directory(&self, path: &Path) -> StencilResult<()> {
        if self.filesystem.exists(path) {
            debug!(path = %path.display(), "Removing previous output");
            self.filesystem.remove_all(path).map_err(|e| {
                ApplicationError::DirectoryResetFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
        }
        self.filesystem.create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::RwLock;

    use serde_json::json;

    use crate::application::{
        error::RenderError,
        ports::{MockSourceFetcher, TemplateRenderer},
    };
    use crate::domain::{GroupReference, TemplateGroup, Values};

    /// Flat in-memory tree: files only, directories are implied.
    #[derive(Default)]
    struct FakeFs {
        files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
        fail_removal: bool,
    }

    impl FakeFs {
        fn text(&self, path: &str) -> Option<String> {
            self.files
                .read()
                .unwrap()
                .get(Path::new(path))
                .map(|b| String::from_utf8_lossy(b).into_owned())
        }
    }

    impl Filesystem for FakeFs {
        fn create_dir_all(&self, _path: &Path) -> StencilResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()> {
            self.files
                .write()
                .unwrap()
                .insert(path.to_path_buf(), content.to_vec());
            Ok(())
        }
        fn read_file(&self, path: &Path) -> StencilResult<Vec<u8>> {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into())
        }
        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().keys().any(|p| p.starts_with(path))
        }
        fn remove_all(&self, path: &Path) -> StencilResult<()> {
            if self.fail_removal {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "permission denied".into(),
                }
                .into());
            }
            self.files.write().unwrap().retain(|p, _| !p.starts_with(path));
            Ok(())
        }
    }

    /// Renders `key=value` lines for every binding, ignoring the source.
    struct DumpRenderer;

    impl TemplateRenderer for DumpRenderer {
        fn render(&self, _name: &str, _source: &str, values: &Values) -> Result<String, RenderError> {
            Ok(values
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }

    fn processor(fs: Arc<FakeFs>) -> RepositoryProcessor {
        let materializer = FileMaterializer::new(
            Arc::new(MockSourceFetcher::new()),
            Arc::new(DumpRenderer),
            fs.clone(),
        );
        RepositoryProcessor::new(materializer, fs)
    }

    fn values(pairs: &[(&str, serde_json::Value)]) -> Values {
        pairs.iter().map(|(k, v)| ((*k).into(), v.clone())).collect()
    }

    fn base_group() -> TemplateGroups {
        TemplateGroups::new(vec![TemplateGroup {
            name: "base".into(),
            files: vec![
                FileSpec::inline("README.md", "ignored")
                    .with_values(values(&[("b", json!(3)), ("c", json!(4))])),
            ],
        }])
    }

    fn repository(group_values: Values) -> RepositoryConfig {
        RepositoryConfig {
            name: "svc".into(),
            files: vec![FileSpec::inline("own.txt", "ignored")],
            groups: vec![GroupReference {
                group_name: "base".into(),
                values: group_values,
            }],
        }
    }

    #[test]
    fn group_values_override_file_values() {
        let fs = Arc::new(FakeFs::default());
        let summary = processor(fs.clone())
            .process(
                &repository(values(&[("a", json!(1)), ("b", json!(2))])),
                &base_group(),
                Path::new("out"),
            )
            .unwrap();

        assert_eq!(summary.rendered, 2);
        assert_eq!(fs.text("out/svc/README.md").unwrap(), "a=1\nb=2\nc=4");
    }

    #[test]
    fn stale_files_are_removed() {
        let fs = Arc::new(FakeFs::default());
        fs.write_file(Path::new("out/svc/stale.txt"), b"old").unwrap();
        fs.write_file(Path::new("out/other/keep.txt"), b"keep").unwrap();

        processor(fs.clone())
            .process(&repository(Values::new()), &base_group(), Path::new("out"))
            .unwrap();

        assert!(fs.text("out/svc/stale.txt").is_none());
        assert!(fs.text("out/svc/own.txt").is_some());
        assert_eq!(fs.text("out/other/keep.txt").unwrap(), "keep");
    }

    #[test]
    fn unusable_names_never_touch_the_output_root() {
        for name in ["", ".", "..", "/abs"] {
            let fs = Arc::new(FakeFs::default());
            fs.write_file(Path::new("out/other/keep.txt"), b"keep").unwrap();
            let repository = RepositoryConfig {
                name: name.into(),
                ..repository(Values::new())
            };

            let err = processor(fs.clone())
                .process(&repository, &base_group(), Path::new("out"))
                .unwrap_err();

            assert!(
                err.to_string().contains("invalid repository name"),
                "{name:?}: {err}"
            );
            assert_eq!(fs.text("out/other/keep.txt").unwrap(), "keep");
            assert_eq!(fs.files.read().unwrap().len(), 1, "{name:?} wrote files");
        }
    }

    #[test]
    fn reset_failure_is_reported_for_the_repository() {
        let fs = Arc::new(FakeFs {
            fail_removal: true,
            ..FakeFs::default()
        });
        fs.write_file(Path::new("out/svc/stale.txt"), b"old").unwrap();

        let err = processor(fs)
            .process(&repository(Values::new()), &base_group(), Path::new("out"))
            .unwrap_err();

        match err {
            StencilError::Application(ApplicationError::RepositoryFailed { repository, source }) => {
                assert_eq!(repository, "svc");
                assert!(matches!(
                    *source,
                    StencilError::Application(ApplicationError::DirectoryResetFailure { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_group_fails_the_repository() {
        let fs = Arc::new(FakeFs::default());
        let err = processor(fs)
            .process(
                &repository(Values::new()),
                &TemplateGroups::default(),
                Path::new("out"),
            )
            .unwrap_err();

        assert!(err.to_string().contains("'svc'"));
        assert!(err.to_string().contains("base"));
    }

    #[test]
    fn shared_group_is_not_mutated() {
        let groups = base_group();
        let before = groups.clone();
        let fs = Arc::new(FakeFs::default());

        processor(fs)
            .process(
                &repository(values(&[("b", json!("override"))])),
                &groups,
                Path::new("out"),
            )
            .unwrap();

        assert_eq!(groups, before);
    }
}
