//! Root configuration aggregate.
//!
//! ```yaml
//! templateGroups:
//!   base:
//!     - filename: README.md
//!       content: "# {{ .Name }}"
//! repositories:
//!   - name: svc-a
//!     files:
//!       - filename: .gitignore
//!         sourceFile: gitignore.tmpl
//!     groups:
//!       - groupName: base
//!         values:
//!           Name: svc-a
//! ```

use std::fmt;
use std::path::{Component, Path};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::domain::{
    entities::file_spec::{FileSpec, values_or_empty},
    error::DomainError,
    value_objects::Values,
};

/// Everything loaded from a scaffold configuration file.
///
/// Immutable once loaded and normalized; generation only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub template_groups: TemplateGroups,
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

/// One target repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileSpec>,
    #[serde(default)]
    pub groups: Vec<GroupReference>,
}

/// A repository's request to materialize a named group with override values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupReference {
    pub group_name: String,
    #[serde(default, deserialize_with = "values_or_empty")]
    pub values: Values,
}

/// A named, ordered list of files shared between repositories.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateGroup {
    pub name: String,
    pub files: Vec<FileSpec>,
}

/// Template groups in declaration order.
///
/// Deserialized from a mapping, but duplicate keys are kept rather than
/// silently collapsed so the validator can reject them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateGroups(Vec<TemplateGroup>);

impl TemplateGroups {
    pub fn new(groups: Vec<TemplateGroup>) -> Self {
        Self(groups)
    }

    /// First group declared under `name`.
    pub fn get(&self, name: &str) -> Option<&TemplateGroup> {
        self.0.iter().find(|g| g.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut TemplateGroup> {
        self.0.iter_mut()
    }
}

impl<'de> Deserialize<'de> for TemplateGroups {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = TemplateGroups;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of group name to a list of files")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(TemplateGroups::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, files)) = map.next_entry::<String, Option<Vec<FileSpec>>>()? {
                    groups.push(TemplateGroup {
                        name,
                        files: files.unwrap_or_default(),
                    });
                }
                Ok(TemplateGroups(groups))
            }
        }

        deserializer.deserialize_any(GroupsVisitor)
    }
}

impl RepositoryConfig {
    /// The repository's directory name under the output root.
    ///
    /// The name must be exactly one normal path component, so every
    /// repository owns a distinct directory strictly inside the root.
    pub fn output_dir(&self) -> Result<&Path, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidRepositoryName {
            name: self.name.clone(),
            reason: reason.into(),
        };

        let path = Path::new(&self.name);
        let mut components = path.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(path),
            (None, _) => Err(invalid("name is empty")),
            (Some(Component::Normal(_)), Some(_)) => Err(invalid("name contains a path separator")),
            _ => Err(invalid("name must not be '.', '..' or an absolute path")),
        }
    }
}

impl Configuration {
    /// Look up a repository by name.
    pub fn repository(&self, name: &str) -> Option<&RepositoryConfig> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Repositories a run should process: all of them, or the one matching
    /// `filter`.
    pub fn select_repositories(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<&RepositoryConfig>, DomainError> {
        match filter {
            None => Ok(self.repositories.iter().collect()),
            Some(name) => {
                let selected: Vec<_> = self
                    .repositories
                    .iter()
                    .filter(|r| r.name == name)
                    .collect();
                if selected.is_empty() {
                    return Err(DomainError::UnknownRepository { name: name.into() });
                }
                Ok(selected)
            }
        }
    }

    /// Join every `sourceFile` with `templates_root`.
    ///
    /// Must run exactly once, right after loading: every relative path is
    /// joined unconditionally, so a second pass would join the root again.
    pub fn normalize_source_paths(&mut self, templates_root: &Path) {
        let normalize = |spec: &mut FileSpec| {
            if let Some(path) = spec.source_file.as_mut() {
                *path = templates_root.join(&*path);
            }
        };

        for group in self.template_groups.iter_mut() {
            group.files.iter_mut().for_each(normalize);
        }
        for repository in &mut self.repositories {
            repository.files.iter_mut().for_each(normalize);
        }
    }

    /// Total number of file entries across groups and repositories.
    pub fn file_count(&self) -> usize {
        self.template_groups
            .iter()
            .map(|g| g.files.len())
            .chain(self.repositories.iter().map(|r| r.files.len()))
            .sum()
    }
}
