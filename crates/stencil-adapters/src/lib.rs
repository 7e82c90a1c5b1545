//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`
//! and loads scaffold configuration files.
//! It contains all external dependencies and I/O operations.

pub mod config_loader;
pub mod fetcher;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use config_loader::ConfigLoader;
pub use fetcher::{HttpFetcher, MemoryFetcher};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::TextTemplateRenderer;
