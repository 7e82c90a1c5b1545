//! Implementation of the `stencil generate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, instrument};

use stencil_adapters::{HttpFetcher, LocalFilesystem, TextTemplateRenderer};
use stencil_core::{
    application::{DispatchReport, Dispatcher, FileMaterializer, RepositoryProcessor},
    domain::Parallelism,
    error::StencilError,
};

use crate::{
    build_info::BuildInfo,
    cli::{GenerateArgs, OutputFormat},
    config::AppSettings,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    progress::ProgressObserver,
};

/// Command-line flags folded over the loaded settings.
#[derive(Debug)]
struct Resolved {
    output: PathBuf,
    templates: PathBuf,
    parallelism: Parallelism,
    fetch_timeout: Duration,
}

impl Resolved {
    fn new(args: &GenerateArgs, settings: &AppSettings) -> CliResult<Self> {
        let max_parallel = args.max_parallel.unwrap_or(settings.max_parallel);
        let fetch_timeout = args.fetch_timeout.unwrap_or(settings.fetch_timeout_secs);
        if fetch_timeout == 0 {
            return Err(CliError::InvalidInput {
                message: "fetch timeout must be at least one second".into(),
            });
        }

        Ok(Self {
            output: args.output.clone().unwrap_or_else(|| settings.output_dir.clone()),
            templates: args
                .templates
                .clone()
                .unwrap_or_else(|| settings.templates_dir.clone()),
            parallelism: Parallelism::new(max_parallel).map_err(StencilError::from)?,
            fetch_timeout: Duration::from_secs(fetch_timeout),
        })
    }
}

#[instrument(skip_all, fields(config = %args.config.display()))]
pub fn execute(
    args: GenerateArgs,
    settings: AppSettings,
    build: &BuildInfo,
    output: OutputManager,
) -> CliResult<()> {
    let resolved = Resolved::new(&args, &settings)?;
    let config = super::load_validated(&args.config, &resolved.templates)?;

    let filesystem = Arc::new(LocalFilesystem::new());
    let materializer = FileMaterializer::new(
        Arc::new(HttpFetcher::new(resolved.fetch_timeout)?),
        Arc::new(TextTemplateRenderer::new()),
        filesystem.clone(),
    );

    let total = match args.repo {
        Some(_) => 1,
        None => config.repositories.len(),
    };
    let progress = ProgressObserver::new(total, output.is_interactive());
    let dispatcher = Dispatcher::new(RepositoryProcessor::new(materializer, filesystem))
        .with_observer(Box::new(progress.clone()));

    output.header(&format!(
        "Generating {} repositories into {} ({} at a time)",
        total,
        resolved.output.display(),
        resolved.parallelism
    ))?;

    let result = dispatcher.run(
        &config,
        args.repo.as_deref(),
        resolved.parallelism,
        &resolved.output,
    );
    progress.finish();
    let report = result?;

    info!(run_id = %report.run_id, "Dispatch complete");

    if output.format() == OutputFormat::Json {
        let payload = serde_json::to_string_pretty(&report_json(&report))
            .with_cli_context(|| "encoding the generation report")?;
        output.data(&payload)?;
    } else {
        print_report(&report, build, &output)?;
    }

    let failed = report.failed().count();
    if failed > 0 {
        return Err(CliError::RepositoriesFailed {
            failed,
            total: report.outcomes.len(),
        });
    }
    Ok(())
}

fn print_report(report: &DispatchReport, build: &BuildInfo, output: &OutputManager) -> CliResult<()> {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(summary) => output.success(&format!(
                "{} ({} rendered, {} copied) in {} ms",
                outcome.repository,
                summary.rendered,
                summary.copied,
                outcome.elapsed.as_millis()
            ))?,
            Err(e) => output.error(&format!("{}: {}", outcome.repository, root_cause(e)))?,
        }
    }

    output.print("")?;
    output.info(&format!(
        "Completed: {} succeeded, {} failed, elapsed {:.2}s",
        report.succeeded().count(),
        report.failed().count(),
        build.elapsed().as_secs_f64()
    ))?;
    Ok(())
}

/// The cause of a repository failure, without the repository prefix.
fn root_cause(error: &StencilError) -> String {
    use stencil_core::application::ApplicationError;

    match error {
        StencilError::Application(ApplicationError::RepositoryFailed { source, .. }) => {
            source.to_string()
        }
        other => other.to_string(),
    }
}

fn report_json(report: &DispatchReport) -> serde_json::Value {
    let repositories: Vec<_> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(summary) => json!({
                "repository": outcome.repository,
                "status": "ok",
                "rendered": summary.rendered,
                "copied": summary.copied,
                "skipped": summary.skipped,
                "elapsed_ms": outcome.elapsed.as_millis() as u64,
            }),
            Err(e) => json!({
                "repository": outcome.repository,
                "status": "failed",
                "error": root_cause(e),
                "elapsed_ms": outcome.elapsed.as_millis() as u64,
            }),
        })
        .collect();

    json!({
        "run_id": report.run_id.to_string(),
        "succeeded": report.succeeded().count(),
        "failed": report.failed().count(),
        "elapsed_ms": report.elapsed.as_millis() as u64,
        "repositories": repositories,
    })
}
