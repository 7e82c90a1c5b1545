//! Implementation of the `stencil validate` command.

use tracing::instrument;

use crate::{cli::ValidateArgs, config::AppSettings, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(config = %args.config.display()))]
pub fn execute(args: ValidateArgs, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    let templates = args.templates.unwrap_or(settings.templates_dir);
    let config = super::load_validated(&args.config, &templates)?;

    output.success(&format!(
        "{} is valid: {} repositories, {} template groups, {} files",
        args.config.display(),
        config.repositories.len(),
        config.template_groups.len(),
        config.file_count()
    ))?;
    Ok(())
}
