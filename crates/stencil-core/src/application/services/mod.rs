//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports:
//! validate a configuration, materialize one file, process one repository,
//! dispatch many repositories in parallel.

pub mod dispatch_service;
pub mod materializer;
pub mod repository_service;
pub mod validation_service;

pub use dispatch_service::{DispatchReport, Dispatcher, RepositoryOutcome};
pub use materializer::{FileMaterializer, Materialized};
pub use repository_service::{RepositoryProcessor, RepositorySummary};
pub use validation_service::ConfigValidator;
