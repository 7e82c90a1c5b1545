//! In-memory fetcher for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use stencil_core::{
    application::{ApplicationError, ports::SourceFetcher},
    error::StencilResult,
};

/// Serves canned bodies by URL. Unknown URLs behave like a 404.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
    delay: Option<Duration>,
    requests: Arc<AtomicUsize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl AsRef<[u8]>) -> Self {
        self.bodies.insert(url.into(), body.as_ref().to_vec());
        self
    }

    /// Sleep this long on every fetch, to keep workers busy.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches served so far, across clones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> StencilResult<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.bodies.get(url).cloned().ok_or_else(|| {
            ApplicationError::SourceUnavailable {
                file: String::new(),
                source_ref: url.into(),
                reason: "HTTP 404 Not Found".into(),
            }
            .into()
        })
    }
}
