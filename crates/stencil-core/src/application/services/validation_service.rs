//! Configuration validation.
//!
//! Runs every check before any output directory is touched. Checks run in a
//! fixed order and the first violation wins:
//! 1. Repository names are unique
//! 2. Every repository name is a single plain directory name
//! 3. Template group names are unique
//! 4. Every file declares exactly one source and local sources exist
//! 5. Every group reference names a declared group
//! 6. Every `sourceUrl` is an absolute http(s) URL

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{Configuration, DomainError, DomainValidator as validator, FileSpec},
    error::StencilResult,
};

/// Validates a loaded configuration.
pub struct ConfigValidator {
    filesystem: Box<dyn Filesystem>,
}

impl ConfigValidator {
    /// `filesystem` is used only to check that local template files exist.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Reject `config` with the first rule it violates.
    #[instrument(
        skip_all,
        fields(
            repositories = config.repositories.len(),
            groups = config.template_groups.len()
        )
    )]
    pub fn validate(&self, config: &Configuration) -> StencilResult<()> {
        validator::validate_unique_repository_names(config)?;
        validator::validate_repository_names(config)?;
        validator::validate_unique_group_names(config)?;

        for (owner, spec) in owned_specs(config) {
            self.validate_file(&owner, spec)?;
        }

        validator::validate_group_references(config)?;

        for (owner, spec) in owned_specs(config) {
            validator::validate_source_url(&owner, spec)?;
        }

        debug!(files = config.file_count(), "Configuration is valid");
        Ok(())
    }

    fn validate_file(&self, owner: &str, spec: &FileSpec) -> Result<(), DomainError> {
        validator::validate_file_source(owner, spec)?;

        if let Some(path) = &spec.source_file {
            if !self.filesystem.exists(path) {
                return Err(DomainError::MissingSourceFile {
                    owner: owner.into(),
                    file: spec.filename.to_string(),
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Every file spec with a label for the group or repository declaring it.
///
/// Groups come first, then repository-direct files, each in declaration
/// order.
fn owned_specs(config: &Configuration) -> impl Iterator<Item = (String, &FileSpec)> {
    let groups = config.template_groups.iter().flat_map(|group| {
        group
            .files
            .iter()
            .map(move |spec| (format!("template group '{}'", group.name), spec))
    });
    let repositories = config.repositories.iter().flat_map(|repository| {
        repository
            .files
            .iter()
            .map(move |spec| (format!("repository '{}'", repository.name), spec))
    });
    groups.chain(repositories)
}
