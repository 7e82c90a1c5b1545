//! Blocking HTTP fetcher.

use std::time::Duration;

use tracing::{debug, instrument};

use stencil_core::{
    application::{ApplicationError, ports::SourceFetcher},
    error::{StencilError, StencilResult},
};

/// Fetches `sourceUrl` files with a blocking `reqwest` client.
///
/// The client is built once and shared by every worker thread. Any status
/// of 400 or above is treated as a failure.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> StencilResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stencil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StencilError::Configuration {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl SourceFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> StencilResult<Vec<u8>> {
        let unavailable = |reason: String| ApplicationError::SourceUnavailable {
            file: String::new(),
            source_ref: url.into(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(unavailable(format!("HTTP {status}")).into());
        }

        let body = response
            .bytes()
            .map_err(|e| unavailable(format!("failed to read body: {e}")))?;
        debug!(bytes = body.len(), %status, "Fetched");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one canned HTTP response on a random local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}/file")
    }

    #[test]
    fn returns_the_body_on_success() {
        let url = serve_once("200 OK", "MIT License");
        let body = HttpFetcher::new(Duration::from_secs(5))
            .unwrap()
            .fetch(&url)
            .unwrap();

        assert_eq!(body, b"MIT License");
    }

    #[test]
    fn client_errors_are_source_unavailable() {
        let url = serve_once("404 Not Found", "");
        let err = HttpFetcher::new(Duration::from_secs(5))
            .unwrap()
            .fetch(&url)
            .unwrap_err();

        match err {
            StencilError::Application(ApplicationError::SourceUnavailable { reason, source_ref, .. }) => {
                assert!(reason.contains("404"), "reason = {reason}");
                assert_eq!(source_ref, url);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreachable_host_is_source_unavailable() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = HttpFetcher::new(Duration::from_secs(2))
            .unwrap()
            .fetch(&format!("http://127.0.0.1:{port}/x"))
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::SourceUnavailable { .. })
        ));
    }
}
