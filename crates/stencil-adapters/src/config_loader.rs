//! Scaffold configuration loading.
//!
//! Reads the configuration file, picks a parser from its extension and
//! resolves every `sourceFile` against the templates directory.
//!
//! | Extension        | Format |
//! |------------------|--------|
//! | `.yaml`, `.yml`  | YAML   |
//! | `.toml`          | TOML   |
//! | `.json`          | JSON   |
//! | anything else    | YAML   |

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use stencil_core::{
    application::ApplicationError,
    domain::Configuration,
    error::StencilResult,
};

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Loads scaffold configurations relative to a templates directory.
///
/// # Example
///
/// ```no_run
/// use stencil_adapters::ConfigLoader;
///
/// let config = ConfigLoader::new("templates").load("stencil.yaml".as_ref())?;
/// println!("{} repositories", config.repositories.len());
/// # Ok::<(), stencil_core::error::StencilError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    templates_root: PathBuf,
}

impl ConfigLoader {
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates_root: templates_root.into(),
        }
    }

    pub fn templates_root(&self) -> &Path {
        &self.templates_root
    }

    /// Read, parse and normalize the configuration at `path`.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::ConfigNotFound`] if `path` does not exist
    /// - [`ApplicationError::ConfigLoad`] if it cannot be read or parsed
    #[instrument(skip(self), fields(templates = %self.templates_root.display()))]
    pub fn load(&self, path: &Path) -> StencilResult<Configuration> {
        if !path.exists() {
            return Err(ApplicationError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path).map_err(|e| ApplicationError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let format = ConfigFormat::from_path(path);
        let config = self.parse(&content, format).map_err(|reason| {
            ApplicationError::ConfigLoad {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        debug!(
            %format,
            repositories = config.repositories.len(),
            groups = config.template_groups.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse `content` and resolve local sources against the templates root.
    pub fn parse(&self, content: &str, format: ConfigFormat) -> Result<Configuration, String> {
        let mut config = if content.trim().is_empty() {
            Configuration::default()
        } else {
            match format {
                ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
                ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
                ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
            }
        };

        config.normalize_source_paths(&self.templates_root);
        Ok(config)
    }
}
