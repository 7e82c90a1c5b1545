//! Dispatcher - runs repositories in parallel under a concurrency bound.
//!
//! Each selected repository is processed on a dedicated rayon pool sized to
//! the requested parallelism, so at most that many repositories are in
//! flight at once. One repository failing never stops the others; every
//! outcome is collected into a [`DispatchReport`].

use std::path::Path;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ports::{DispatchObserver, NoopObserver},
        services::repository_service::{RepositoryProcessor, RepositorySummary},
    },
    domain::{Configuration, Parallelism},
    error::{Context, StencilError, StencilResult},
};

/// Result of processing one repository.
#[derive(Debug, Clone)]
pub struct RepositoryOutcome {
    pub repository: String,
    pub result: Result<RepositorySummary, StencilError>,
    pub elapsed: Duration,
}

impl RepositoryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a dispatch did, in repository declaration order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Correlates log lines of one run.
    pub run_id: Uuid,
    pub outcomes: Vec<RepositoryOutcome>,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(RepositoryOutcome::is_success)
    }
}

/// Parallel front of [`RepositoryProcessor`].
pub struct Dispatcher {
    processor: RepositoryProcessor,
    observer: Box<dyn DispatchObserver>,
}

impl Dispatcher {
    pub fn new(processor: RepositoryProcessor) -> Self {
        Self {
            processor,
            observer: Box::new(NoopObserver),
        }
    }

    /// Report progress to `observer`.
    pub fn with_observer(mut self, observer: Box<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Generate every repository selected by `filter` under `output_root`.
    ///
    /// Fails up front only when `filter` names no repository or the worker
    /// pool cannot be started. Per-repository failures are in the report.
    #[instrument(
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            max_parallel = %parallelism,
            output = %output_root.display()
        )
    )]
    pub fn run(
        &self,
        config: &Configuration,
        filter: Option<&str>,
        parallelism: Parallelism,
        output_root: &Path,
    ) -> StencilResult<DispatchReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let selected = config.select_repositories(filter)?;
        info!(repositories = selected.len(), "Starting generation");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism.get())
            .thread_name(|i| format!("stencil-worker-{i}"))
            .build()
            .context("starting worker pool")?;

        let started = Instant::now();
        let outcomes: Vec<RepositoryOutcome> = pool.install(|| {
            selected
                .par_iter()
                .map(|repository| {
                    self.observer.on_started(&repository.name);
                    let begun = Instant::now();
                    let result =
                        self.processor
                            .process(repository, &config.template_groups, output_root);

                    if let Err(e) = &result {
                        error!(repository = %repository.name, error = %e, "Repository failed");
                    }

                    let outcome = RepositoryOutcome {
                        repository: repository.name.clone(),
                        result,
                        elapsed: begun.elapsed(),
                    };
                    self.observer.on_finished(&outcome);
                    outcome
                })
                .collect()
        });

        let report = DispatchReport {
            run_id,
            outcomes,
            elapsed: started.elapsed(),
        };

        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Generation finished"
        );
        Ok(report)
    }
}
