//! Command handlers, one module per subcommand.

pub mod completions;
pub mod generate;
pub mod list;
pub mod settings;
pub mod validate;
pub mod version;

use std::path::Path;

use stencil_adapters::{ConfigLoader, LocalFilesystem};
use stencil_core::{application::ConfigValidator, domain::Configuration};

use crate::error::CliResult;

/// Load `config_path` with `sourceFile` paths resolved under `templates`, then
/// validate it against the local filesystem.
pub(crate) fn load_validated(config_path: &Path, templates: &Path) -> CliResult<Configuration> {
    let config = ConfigLoader::new(templates).load(config_path)?;
    ConfigValidator::new(Box::new(LocalFilesystem::new())).validate(&config)?;
    Ok(config)
}
