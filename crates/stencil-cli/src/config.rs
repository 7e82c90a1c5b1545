//! Tool settings.
//!
//! [`AppSettings`] is loaded once at startup and passed down by value.  The
//! CLI layer owns settings; the core crate never sees them.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed with `STENCIL_`, e.g. `STENCIL_MAX_PARALLEL=8`
//! 3. Settings file (`--settings FILE`, else [`AppSettings::default_path`] if it exists)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where repository directories are generated.
    pub output_dir: PathBuf,
    /// Root that `sourceFile` paths are resolved against.
    pub templates_dir: PathBuf,
    /// Repositories processed at once.
    pub max_parallel: usize,
    /// HTTP timeout for `sourceUrl` files.
    pub fetch_timeout_secs: u64,
    pub no_color: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            templates_dir: PathBuf::from("templates"),
            max_parallel: 5,
            fetch_timeout_secs: 30,
            no_color: false,
        }
    }
}

impl AppSettings {
    /// Resolve settings from defaults, file and environment.
    ///
    /// An explicitly given `settings_file` must exist; the default location
    /// is optional.
    pub fn load(settings_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match settings_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        Config::builder()
            .add_source(Config::try_from(&Self::default()).context("encoding default settings")?)
            .add_source(File::from(path.as_path()).required(required))
            .add_source(Environment::with_prefix("STENCIL").try_parsing(true))
            .build()
            .with_context(|| format!("reading settings from {}", path.display()))?
            .try_deserialize()
            .context("invalid settings")
    }

    /// Path to the default settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stencil", "stencil")
            .map(|d| d.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }
}
