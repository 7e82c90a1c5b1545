//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Stencil, the
//! per-repository scaffold generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ConfigValidator, Dispatcher,          │
//! │   RepositoryProcessor, FileMaterializer)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, SourceFetcher, Renderer)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │ (LocalFilesystem, HttpFetcher, etc)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Configuration, FileSpec, merge_values) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::prelude::*;
//!
//! let materializer = FileMaterializer::new(fetcher, renderer, filesystem.clone());
//! let processor = RepositoryProcessor::new(materializer, filesystem);
//! let dispatcher = Dispatcher::new(processor);
//!
//! let report = dispatcher.run(&config, None, Parallelism::new(4)?, "out".as_ref())?;
//! assert!(report.is_success());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigValidator, DispatchReport, Dispatcher, FileMaterializer, Materialized,
        RepositoryOutcome, RepositoryProcessor, RepositorySummary,
        ports::{DispatchObserver, Filesystem, SourceFetcher, TemplateRenderer},
    };
    pub use crate::domain::{
        Configuration, FileSource, FileSpec, GroupReference, Parallelism, RepositoryConfig,
        TemplateGroup, TemplateGroups, Values, merge_values,
    };
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
