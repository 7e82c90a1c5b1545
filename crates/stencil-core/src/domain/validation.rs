use std::collections::HashSet;

use crate::domain::{
    entities::{Configuration, FileSpec},
    error::{DomainError, NameKind},
};

/// Centralized domain validation.
///
/// Pure checks only; anything that needs the filesystem is composed in the
/// application layer's `ConfigValidator`.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_unique_repository_names(config: &Configuration) -> Result<(), DomainError> {
        first_duplicate(config.repositories.iter().map(|r| r.name.as_str())).map_or(
            Ok(()),
            |name| {
                Err(DomainError::DuplicateName {
                    kind: NameKind::Repository,
                    name: name.into(),
                })
            },
        )
    }

    /// Every repository name must map to its own directory under the
    /// output root.
    pub fn validate_repository_names(config: &Configuration) -> Result<(), DomainError> {
        config
            .repositories
            .iter()
            .try_for_each(|r| r.output_dir().map(|_| ()))
    }

    pub fn validate_unique_group_names(config: &Configuration) -> Result<(), DomainError> {
        first_duplicate(config.template_groups.iter().map(|g| g.name.as_str())).map_or(
            Ok(()),
            |name| {
                Err(DomainError::DuplicateName {
                    kind: NameKind::TemplateGroup,
                    name: name.into(),
                })
            },
        )
    }

    /// Exactly one source must be declared.
    pub fn validate_file_source(owner: &str, spec: &FileSpec) -> Result<(), DomainError> {
        let declared = spec.declared_sources();
        match declared.len() {
            0 => Err(DomainError::EmptySource {
                owner: owner.into(),
                file: spec.filename.to_string(),
            }),
            1 => Ok(()),
            _ => Err(DomainError::ConflictingSource {
                owner: owner.into(),
                file: spec.filename.to_string(),
                sources: declared.join(", "),
            }),
        }
    }

    pub fn validate_group_references(config: &Configuration) -> Result<(), DomainError> {
        for repository in &config.repositories {
            for reference in &repository.groups {
                if !config.template_groups.contains(&reference.group_name) {
                    return Err(DomainError::UnknownGroup {
                        repository: repository.name.clone(),
                        group: reference.group_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// A declared `sourceUrl` must be an absolute http(s) URL.
    pub fn validate_source_url(owner: &str, spec: &FileSpec) -> Result<(), DomainError> {
        let Some(raw) = spec.source_url.as_deref() else {
            return Ok(());
        };
        let invalid = |reason: String| DomainError::InvalidUrl {
            owner: owner.into(),
            file: spec.filename.to_string(),
            url: raw.into(),
            reason,
        };

        let url = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(()),
            "http" | "https" => Err(invalid("missing host".into())),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}
