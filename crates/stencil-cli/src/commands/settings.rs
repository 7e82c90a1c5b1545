//! Implementation of the `stencil settings` command.

use std::path::Path;

use crate::{
    cli::SettingsCommands,
    config::AppSettings,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: SettingsCommands,
    settings_file: Option<&Path>,
    settings: AppSettings,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        SettingsCommands::Show => {
            let rendered =
                toml::to_string_pretty(&settings).map_err(|e| CliError::SettingsError {
                    message: "could not render settings as TOML".into(),
                    source: Some(Box::new(e)),
                })?;
            output.data(rendered.trim_end())?;
        }
        SettingsCommands::Path => {
            let path = settings_file
                .map(Path::to_path_buf)
                .unwrap_or_else(AppSettings::default_path);
            output.data(&path.display().to_string())?;
        }
    }
    Ok(())
}
