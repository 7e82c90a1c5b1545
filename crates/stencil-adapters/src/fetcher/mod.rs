//! Remote source fetchers.

mod http;
mod memory;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;
