//! Implementation of the `stencil list` command.

use serde_json::json;

use stencil_adapters::ConfigLoader;
use stencil_core::domain::Configuration;

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppSettings,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: ListArgs, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    // Listing does not touch templates, so the configuration is only loaded.
    let config = ConfigLoader::new(&settings.templates_dir).load(&args.config)?;

    match args.format {
        ListFormat::Table => {
            output.header("Repositories:")?;
            for repository in &config.repositories {
                let groups: Vec<_> = repository
                    .groups
                    .iter()
                    .map(|g| g.group_name.as_str())
                    .collect();
                output.print(&format!(
                    "  {} ({} files; groups: {})",
                    repository.name,
                    repository.files.len(),
                    if groups.is_empty() {
                        "none".to_string()
                    } else {
                        groups.join(", ")
                    }
                ))?;
            }

            output.header("Template groups:")?;
            for group in config.template_groups.iter() {
                output.print(&format!("  {} ({} files)", group.name, group.files.len()))?;
            }
        }
        ListFormat::List => {
            for repository in &config.repositories {
                output.data(&repository.name)?;
            }
        }
        ListFormat::Json => {
            let payload = serde_json::to_string_pretty(&listing(&config))
                .with_cli_context(|| "encoding the listing")?;
            output.data(&payload)?;
        }
    }

    Ok(())
}

fn listing(config: &Configuration) -> serde_json::Value {
    json!({
        "repositories": config.repositories.iter().map(|r| json!({
            "name": r.name,
            "files": r.files.iter().map(|f| f.filename.to_string()).collect::<Vec<_>>(),
            "groups": r.groups.iter().map(|g| g.group_name.as_str()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "templateGroups": config.template_groups.iter().map(|g| json!({
            "name": g.name,
            "files": g.files.iter().map(|f| f.filename.to_string()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}
