//! The declarative description of one output file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::domain::{entities::common::RelativePath, value_objects::Values};

/// One output file: destination, content source, template variables.
///
/// The three source fields mirror the configuration file one-to-one so that
/// conflicting declarations survive loading and can be reported by the
/// validator. Use [`FileSpec::source`] to get the effective source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileSpec {
    /// Destination path relative to the repository output directory.
    pub filename: RelativePath,

    /// Local template file, joined with the templates root at load time.
    #[serde(default, deserialize_with = "non_empty_path")]
    pub source_file: Option<PathBuf>,

    /// Remote file fetched over HTTP.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub source_url: Option<String>,

    /// Inline template text.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub content: Option<String>,

    /// Variable bindings used when rendering.
    #[serde(default, deserialize_with = "values_or_empty")]
    pub values: Values,
}

/// Where a file's raw content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource<'a> {
    /// Literal template text from the configuration.
    Inline(&'a str),
    /// Body of an HTTP GET.
    Remote(&'a str),
    /// Contents of a local file.
    Local(&'a Path),
}

impl FileSource<'_> {
    /// Configuration key this source is declared with.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inline(_) => "content",
            Self::Remote(_) => "sourceUrl",
            Self::Local(_) => "sourceFile",
        }
    }

    /// Inline content must always be valid template syntax; the other sources
    /// may be static assets.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}

impl FileSpec {
    fn bare(filename: impl Into<RelativePath>) -> Self {
        Self {
            filename: filename.into(),
            source_file: None,
            source_url: None,
            content: None,
            values: Values::new(),
        }
    }

    /// A file rendered from inline text.
    pub fn inline(filename: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::bare(filename)
        }
    }

    /// A file fetched from a URL.
    pub fn remote(filename: impl Into<RelativePath>, url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            ..Self::bare(filename)
        }
    }

    /// A file read from a local template.
    pub fn local(filename: impl Into<RelativePath>, path: impl Into<PathBuf>) -> Self {
        Self {
            source_file: Some(path.into()),
            ..Self::bare(filename)
        }
    }

    /// A file with no source at all.
    pub fn empty(filename: impl Into<RelativePath>) -> Self {
        Self::bare(filename)
    }

    /// Replace the variable bindings.
    pub fn with_values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }

    /// The effective source, or `None` when nothing is declared.
    ///
    /// When several sources are declared (rejected by validation) inline
    /// content wins over a URL, which wins over a local file.
    pub fn source(&self) -> Option<FileSource<'_>> {
        if let Some(content) = &self.content {
            Some(FileSource::Inline(content))
        } else if let Some(url) = &self.source_url {
            Some(FileSource::Remote(url))
        } else {
            self.source_file.as_deref().map(FileSource::Local)
        }
    }

    /// Configuration keys of every declared source, in declaration order.
    pub fn declared_sources(&self) -> Vec<&'static str> {
        let mut keys = Vec::with_capacity(3);
        if self.source_file.is_some() {
            keys.push("sourceFile");
        }
        if self.source_url.is_some() {
            keys.push("sourceUrl");
        }
        if self.content.is_some() {
            keys.push("content");
        }
        keys
    }
}

// Empty strings count as "not set", matching how the configuration format
// has always been read.
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

fn non_empty_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(deserializer)?.map(PathBuf::from))
}

// `values:` with nothing after it is a null, not a mapping.
pub(crate) fn values_or_empty<'de, D>(deserializer: D) -> Result<Values, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Values>::deserialize(deserializer)?.unwrap_or_default())
}
