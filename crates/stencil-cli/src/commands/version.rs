//! Implementation of the `stencil version` command.

use crate::{build_info::BuildInfo, cli::OutputFormat, error::{CliResult, IntoCli}, output::OutputManager};

pub fn execute(build: &BuildInfo, output: OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let payload = serde_json::to_string_pretty(build)
            .with_cli_context(|| "encoding build information")?;
        return Ok(output.data(&payload)?);
    }

    output.data(&format!("stencil {}", build.version))?;
    output.data(&format!(
        "revision: {}",
        build.git_revision.unwrap_or("unknown")
    ))?;
    output.data(&format!("platform: {}", build.platform))?;
    output.data(&format!("started:  {}", build.started_at.to_rfc3339()))?;
    Ok(())
}
