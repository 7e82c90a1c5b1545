//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stencil-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `SourceFetcher`: Remote source retrieval
//!   - `TemplateRenderer`: Template rendering
//!   - `DispatchObserver`: Progress reporting

pub mod output;

pub use output::{DispatchObserver, Filesystem, NoopObserver, SourceFetcher, TemplateRenderer};

#[cfg(test)]
pub use output::MockSourceFetcher;
